use crate::*;
use reposize::controller::{PassOutcome, Reconciler};
use reposize::error::Result;
use reposize::github::FetchErrorKind;
use reposize::github::constants::{PRIVATE_LABEL_QUERY, PRIVATE_LABEL_TEXT};
use reposize::page::{Indicator, MemoryPage};
use reposize::settings::{MemoryStore, save_token, set_auto_ask};

pub fn tests(service: &MockGithub, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        service,
        test_public_repository_shows_size,
        test_private_repository_without_token,
        test_private_repository_auto_ask_disabled,
        test_private_repository_with_token,
        test_revoked_token_replaces_size,
        test_repeated_passes_keep_one_indicator
    ));
}

fn private_page(repo: &reposize::github::utils::repo::RepoIdentity) -> MemoryPage {
    let page = MemoryPage::repository(MockGithub::page_url(repo));
    page.add_node(PRIVATE_LABEL_QUERY, PRIVATE_LABEL_TEXT);
    page
}

pub async fn test_public_repository_shows_size(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(2048));
    let page = MemoryPage::repository(MockGithub::page_url(&repo));
    let reconciler = Reconciler::new(page, MemoryStore::new(), service.client());

    let outcome = reconciler.reconcile().await;
    assert!(matches!(outcome, PassOutcome::Rendered(_)));
    assert_eq!(
        reconciler.page().indicator_text().as_deref(),
        Some("2.00 MiB")
    );
    assert_eq!(service.requests_for(&repo)[0].endpoint, "rest");
    Ok(())
}

pub async fn test_private_repository_without_token(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(2048));
    let reconciler = Reconciler::new(private_page(&repo), MemoryStore::new(), service.client());

    assert_eq!(
        reconciler.reconcile().await,
        PassOutcome::MissingToken { prompted: true }
    );
    assert_eq!(reconciler.page().prompt_count(), 1);
    assert_eq!(
        reconciler.page().indicators()[0].1,
        Indicator::MissingToken
    );
    assert!(service.requests_for(&repo).is_empty());
    Ok(())
}

pub async fn test_private_repository_auto_ask_disabled(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(2048));
    let settings = MemoryStore::new();
    set_auto_ask(&settings, false).await?;
    let reconciler = Reconciler::new(private_page(&repo), settings, service.client());

    assert_eq!(
        reconciler.reconcile().await,
        PassOutcome::MissingToken { prompted: false }
    );
    assert_eq!(reconciler.page().prompt_count(), 0);
    assert!(service.requests_for(&repo).is_empty());
    Ok(())
}

pub async fn test_private_repository_with_token(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(3 * 1024 * 1024));
    let settings = MemoryStore::new();
    save_token(&settings, TEST_TOKEN).await?;
    let reconciler = Reconciler::new(private_page(&repo), settings, service.client());

    assert!(matches!(reconciler.reconcile().await, PassOutcome::Rendered(_)));
    assert_eq!(
        reconciler.page().indicator_text().as_deref(),
        Some("3.00 GiB")
    );
    assert_eq!(service.requests_for(&repo)[0].endpoint, "graphql");
    Ok(())
}

pub async fn test_revoked_token_replaces_size(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(512));
    let page = MemoryPage::repository(MockGithub::page_url(&repo));
    let reconciler = Reconciler::new(page, MemoryStore::new(), service.client());

    reconciler.reconcile().await;
    assert_eq!(
        reconciler.page().indicator_text().as_deref(),
        Some("512.00 KiB")
    );

    save_token(reconciler.settings(), REVOKED_TOKEN).await?;
    assert_eq!(
        reconciler.reconcile().await,
        PassOutcome::Failed(FetchErrorKind::Unauthorized)
    );
    let indicators = reconciler.page().indicators();
    assert_eq!(indicators.len(), 1);
    assert_eq!(indicators[0].1.text(), "Unauthorized Token!");
    Ok(())
}

pub async fn test_repeated_passes_keep_one_indicator(service: MockGithub) -> Result<()> {
    let repo = service.add_repo(MockRepo::Size(1));
    let page = MemoryPage::repository(MockGithub::page_url(&repo));
    let reconciler = Reconciler::new(page, MemoryStore::new(), service.client());

    reconciler.reconcile().await;
    reconciler.reconcile().await;

    assert_eq!(reconciler.page().indicators().len(), 1);
    assert_eq!(service.requests_for(&repo).len(), 2);
    Ok(())
}
