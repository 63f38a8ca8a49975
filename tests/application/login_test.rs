use crate::common;
use vidtube::application::auth::login::{LoginRequest, LoginUseCase};
use vidtube::application::auth::token_service::hash_token;
use vidtube::shared::error::AppError;

fn login_use_case(ctx: &common::TestContext) -> LoginUseCase {
    LoginUseCase::new(
        ctx.repo.clone(),
        ctx.passwords.clone(),
        ctx.token_service(),
    )
}

fn by_username(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: Some(username.to_string()),
        email: None,
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_by_username() {
    let ctx = common::memory_context();
    let account = ctx.seed_account("alice", "a@x.com").await;

    let response = login_use_case(&ctx)
        .execute(by_username("alice", common::PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.account.id, account.id);
    assert!(!response.tokens.access_token.is_empty());
    assert!(!response.tokens.refresh_token.is_empty());
    assert_eq!(response.tokens.token_type, "Bearer");
    assert_eq!(response.tokens.expires_in, common::ACCESS_TTL);
    assert_eq!(response.tokens.refresh_expires_in, common::REFRESH_TTL);

    let stored = ctx.repo.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(
        stored.refresh_token_hash,
        Some(hash_token(&response.tokens.refresh_token))
    );
}

#[tokio::test]
async fn test_login_by_email_case_insensitive() {
    let ctx = common::memory_context();
    ctx.seed_account("alice", "a@x.com").await;

    let response = login_use_case(&ctx)
        .execute(LoginRequest {
            username: None,
            email: Some("A@X.COM".to_string()),
            password: common::PASSWORD.to_string(),
        })
        .await;

    assert!(response.is_ok());
}

#[tokio::test]
async fn test_login_requires_identifier() {
    let ctx = common::memory_context();

    let result = login_use_case(&ctx)
        .execute(LoginRequest {
            username: Some("  ".to_string()),
            email: None,
            password: common::PASSWORD.to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_login_unknown_account() {
    let ctx = common::memory_context();

    let result = login_use_case(&ctx)
        .execute(by_username("nobody", common::PASSWORD))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_login_wrong_password_leaves_session_untouched() {
    let ctx = common::memory_context();
    let account = ctx.seed_account("alice", "a@x.com").await;

    let result = login_use_case(&ctx)
        .execute(by_username("alice", "wrong-password"))
        .await;

    assert!(matches!(result, Err(AppError::AuthError(_))));

    let stored = ctx.repo.find_by_id(account.id).await.unwrap().unwrap();
    assert!(stored.refresh_token_hash.is_none());
}

#[tokio::test]
async fn test_second_login_supersedes_first_session() {
    let ctx = common::memory_context();
    ctx.seed_account("alice", "a@x.com").await;

    let first = login_use_case(&ctx)
        .execute(by_username("alice", common::PASSWORD))
        .await
        .unwrap();
    let second = login_use_case(&ctx)
        .execute(by_username("alice", common::PASSWORD))
        .await
        .unwrap();

    assert_ne!(first.tokens.refresh_token, second.tokens.refresh_token);

    let service = ctx.token_service();
    assert!(matches!(
        service.rotate(&first.tokens.refresh_token).await,
        Err(AppError::StaleToken)
    ));
    assert!(service.rotate(&second.tokens.refresh_token).await.is_ok());
}
