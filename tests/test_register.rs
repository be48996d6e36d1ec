//! Integration tests for account registration

use std::sync::Arc;
use stashed::sessionstore::r#impl::FileSessionStore;
use stashed::userstore::r#impl::SqliteUserStore;
use stashed::CredentialService;
use tempfile::TempDir;

async fn setup() -> (TempDir, CredentialService) {
    let tmp_dir = TempDir::new().unwrap();

    let users = Arc::new(
        SqliteUserStore::open(tmp_dir.path().join("users.db"))
            .await
            .unwrap(),
    );
    let session = Arc::new(FileSessionStore::new(tmp_dir.path().join("session.json")));

    let credentials = CredentialService::new(users, session);
    (tmp_dir, credentials)
}

#[tokio::test]
async fn test_register_success() {
    let (_tmp_dir, credentials) = setup().await;

    assert!(credentials.register("alice", "Abc123").await.unwrap());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (_tmp_dir, credentials) = setup().await;

    assert!(credentials.register("alice", "Abc123").await.unwrap());

    // Every subsequent attempt with the same username fails, whatever
    // the password
    assert!(!credentials.register("alice", "Abc123").await.unwrap());
    assert!(!credentials.register("alice", "Different1").await.unwrap());
}

#[tokio::test]
async fn test_register_two_users() {
    let (_tmp_dir, credentials) = setup().await;

    assert!(credentials.register("alice", "Abc123").await.unwrap());
    assert!(credentials.register("bob", "Xyz789").await.unwrap());
}

#[tokio::test]
async fn test_register_does_not_start_session() {
    let (_tmp_dir, credentials) = setup().await;

    credentials.register("alice", "Abc123").await.unwrap();
    assert_eq!(credentials.logged_in_user().await.unwrap(), None);
}
