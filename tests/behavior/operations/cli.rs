use crate::*;
use predicates::prelude::*;
use reposize::error::Result;

pub fn tests(service: &MockGithub, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        service,
        test_size_public_repository,
        test_size_accepts_repository_url,
        test_size_with_token_flag,
        test_size_with_revoked_token,
        test_size_private_without_token,
        test_size_private_auto_ask_off,
        test_size_not_a_repository,
        test_size_server_error,
        test_token_lifecycle,
        test_stored_token_is_used
    ));
}

pub async fn test_size_public_repository(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(2048));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .assert()
        .success()
        .stdout(predicate::str::diff("2.00 MiB\n"));
    Ok(())
}

pub async fn test_size_accepts_repository_url(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(0));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(format!("{}/tree/main/src", MockGithub::page_url(&repo)))
        .assert()
        .success()
        .stdout(predicate::str::diff("0 B\n"));
    Ok(())
}

pub async fn test_size_with_token_flag(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(1));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .arg("--token")
        .arg(TEST_TOKEN)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.00 KiB"));

    let requests = service.requests_for(&repo);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].endpoint, "graphql");
    // The flag must not be persisted
    assert!(!settings.exists());
    Ok(())
}

pub async fn test_size_with_revoked_token(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(1));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .env("REPOSIZE_TOKEN", REVOKED_TOKEN)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized Token!"));
    Ok(())
}

pub async fn test_size_private_without_token(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(1));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .arg("--private")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing token!"))
        .stderr(predicate::str::contains("reposize token set"));

    assert!(service.requests_for(&repo).is_empty());
    Ok(())
}

pub async fn test_size_private_auto_ask_off(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(1));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("auto-ask")
        .arg("off")
        .assert()
        .success();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .arg("--private")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing token!"))
        .stderr(predicate::str::contains("reposize token set").not());
    Ok(())
}

pub async fn test_size_not_a_repository(service: MockGithub) -> Result<()> {
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg("octocat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a repository path"));
    Ok(())
}

pub async fn test_size_server_error(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Status(503));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown Error!"));
    Ok(())
}

pub async fn test_token_lifecycle(service: MockGithub) -> Result<()> {
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .args(["token", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No token stored"));

    reposize_cmd(&service, &settings)
        .args(["token", "set", "ghp_0123456789abcd"])
        .assert()
        .success();

    reposize_cmd(&service, &settings)
        .args(["token", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghp_…abcd"))
        .stdout(predicate::str::contains("0123456789").not());

    reposize_cmd(&service, &settings)
        .args(["token", "clear"])
        .assert()
        .success();

    reposize_cmd(&service, &settings)
        .args(["token", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No token stored"));

    reposize_cmd(&service, &settings)
        .args(["token", "set"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No token was provided"));
    Ok(())
}

pub async fn test_stored_token_is_used(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(4096));
    let settings = TEST_FIXTURE.new_settings_path();

    reposize_cmd(&service, &settings)
        .args(["token", "set"])
        .write_stdin(format!("{TEST_TOKEN}\n"))
        .assert()
        .success();

    reposize_cmd(&service, &settings)
        .arg("size")
        .arg(repo.to_string())
        .arg("--private")
        .assert()
        .success()
        .stdout(predicate::str::diff("4.00 MiB\n"));

    let requests = service.requests_for(&repo);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );
    Ok(())
}
