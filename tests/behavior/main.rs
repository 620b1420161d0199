use libtest_mimic::Arguments;
use libtest_mimic::Trial;
use reposize::error::Result;


pub use utils::*;

fn main() -> Result<()> {
    let args = Arguments::from_args();

    let service = TEST_RUNTIME.block_on(init_test_service())?;

    let mut tests = Vec::new();

    operations::fetch::tests(&service, &mut tests);
    operations::reconcile::tests(&service, &mut tests);
    operations::watch::tests(&service, &mut tests);
    operations::cli::tests(&service, &mut tests);

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let conclusion = libtest_mimic::run(&args, tests);

    TEST_FIXTURE.cleanup();

    conclusion.exit()
}
