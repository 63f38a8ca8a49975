use crate::common;
use serial_test::serial;
use vidtube::shared::error::AppError;

#[tokio::test]
#[serial]
async fn test_rotation_lifecycle_against_postgres() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let ctx = common::postgres_context(pool.clone());
    let service = ctx.token_service();

    let account = ctx.seed_account("alice", "a@x.com").await;
    let first = service.issue_pair(account.id).await.unwrap();
    let second = service.issue_pair(account.id).await.unwrap();

    assert!(matches!(
        service.rotate(&first.refresh_token).await,
        Err(AppError::StaleToken)
    ));

    let rotated = service.rotate(&second.refresh_token).await.unwrap();
    service.revoke(account.id).await.unwrap();

    assert!(matches!(
        service.rotate(&rotated.refresh_token).await,
        Err(AppError::StaleToken)
    ));

    common::cleanup_test_db(&pool).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_rotation_against_postgres() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let ctx = common::postgres_context(pool.clone());
    let service = ctx.token_service();

    let account = ctx.seed_account("alice", "a@x.com").await;
    let pair = service.issue_pair(account.id).await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            let token = pair.refresh_token.clone();
            tokio::spawn(async move { service.rotate(&token).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::StaleToken) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(successes, 1);

    common::cleanup_test_db(&pool).await;
}
