use crate::common;
use serial_test::serial;
use uuid::Uuid;
use vidtube::domain::accounts::{AccountRepository, AccountStoreError, NewAccount, UpdateAccount};
use vidtube::infrastructure::repositories::accounts::PostgresAccountRepository;

fn new_account(username: &str, email: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        email: email.to_string(),
        full_name: "Alice A".to_string(),
        avatar: "https://cdn.example.com/avatars/alice.png".to_string(),
        cover_image: None,
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[tokio::test]
#[serial]
async fn test_create_and_find() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresAccountRepository::new(pool.clone());

    let created = repo.create(new_account("Alice", "A@X.com")).await.unwrap();
    assert_eq!(created.username, "alice");
    assert_eq!(created.email, "a@x.com");
    assert!(created.refresh_token_hash.is_none());

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.id, created.id);

    let by_handle = repo
        .find_by_handle_or_email(Some("ALICE"), None)
        .await
        .unwrap();
    assert_eq!(by_handle.map(|a| a.id), Some(created.id));

    let by_email = repo
        .find_by_handle_or_email(None, Some("a@x.COM"))
        .await
        .unwrap();
    assert_eq!(by_email.map(|a| a.id), Some(created.id));

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    assert!(
        repo.find_by_handle_or_email(None, None)
            .await
            .unwrap()
            .is_none()
    );

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_unique_constraints_are_case_insensitive() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresAccountRepository::new(pool.clone());

    repo.create(new_account("alice", "a@x.com")).await.unwrap();

    let same_handle = repo.create(new_account("ALICE", "b@x.com")).await;
    assert!(matches!(same_handle, Err(AccountStoreError::Conflict(_))));

    let same_email = repo.create(new_account("bob", "A@x.com")).await;
    assert!(matches!(same_email, Err(AccountStoreError::Conflict(_))));

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_concurrent_creates_single_winner() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresAccountRepository::new(pool.clone());

    let (a, b) = tokio::join!(
        repo.create(new_account("alice", "a@x.com")),
        repo.create(new_account("Alice", "other@x.com")),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert!(
        matches!(a, Err(AccountStoreError::Conflict(_)))
            || matches!(b, Err(AccountStoreError::Conflict(_)))
    );

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_refresh_token_compare_and_swap() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresAccountRepository::new(pool.clone());
    let account = repo.create(new_account("alice", "a@x.com")).await.unwrap();

    assert!(repo.update_refresh_token(account.id, Some("h1")).await.unwrap());

    assert!(!repo.replace_refresh_token(account.id, "wrong", "h2").await.unwrap());
    assert!(repo.replace_refresh_token(account.id, "h1", "h2").await.unwrap());
    assert!(!repo.replace_refresh_token(account.id, "h1", "h3").await.unwrap());

    let stored = repo.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token_hash.as_deref(), Some("h2"));

    assert!(repo.update_refresh_token(account.id, None).await.unwrap());
    assert!(!repo.replace_refresh_token(account.id, "h2", "h4").await.unwrap());

    assert!(
        !repo
            .update_refresh_token(Uuid::new_v4(), Some("h5"))
            .await
            .unwrap()
    );

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_update_details_and_password() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresAccountRepository::new(pool.clone());
    let alice = repo.create(new_account("alice", "a@x.com")).await.unwrap();
    repo.create(new_account("bob", "b@x.com")).await.unwrap();

    let updated = repo
        .update_details(
            alice.id,
            UpdateAccount {
                full_name: Some("Alice Anderson".to_string()),
                cover_image: Some("https://cdn.example.com/covers/a.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.full_name, "Alice Anderson");
    assert_eq!(updated.email, "a@x.com");
    assert_eq!(
        updated.cover_image.as_deref(),
        Some("https://cdn.example.com/covers/a.png")
    );

    let taken = repo
        .update_details(
            alice.id,
            UpdateAccount {
                email: Some("B@x.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(AccountStoreError::Conflict(_))));

    let missing = repo
        .update_details(Uuid::new_v4(), UpdateAccount::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    assert!(repo.update_password(alice.id, "new-hash").await.unwrap());
    let stored = repo.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "new-hash");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_ping() {
    let pool = setup_test_db_or_skip!();
    let repo = PostgresAccountRepository::new(pool);

    assert!(repo.ping().await.is_ok());
}
