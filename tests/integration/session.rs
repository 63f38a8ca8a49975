use crate::common::{self, TestResponse, json_request, send};
use axum::http::StatusCode;
use serde_json::json;

fn cookie_pair(response: &TestResponse, name: &str) -> String {
    response
        .cookie(name)
        .and_then(|c| c.split(';').next().map(str::to_string))
        .expect("cookie missing")
}

async fn register_and_login(app: &axum::Router) -> TestResponse {
    let registered = send(
        app,
        json_request(
            "POST",
            "/api/v1/users/register",
            Some(common::register_body("alice", "a@x.com")),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let login = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": "alice", "password": common::PASSWORD })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    login
}

#[tokio::test]
async fn test_end_to_end_session_lifecycle() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;
    let access = login.body["data"]["accessToken"].as_str().unwrap().to_string();
    let refresh = login.body["data"]["refreshToken"].as_str().unwrap().to_string();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_eq!(login.body["data"]["user"]["username"], "alice");

    let me = send(
        &app,
        json_request("GET", "/api/v1/users/current-user", None, None, Some(&access)),
    )
    .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["email"], "a@x.com");

    ctx.clock.advance(common::ACCESS_TTL);

    let expired = send(
        &app,
        json_request("GET", "/api/v1/users/current-user", None, None, Some(&access)),
    )
    .await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired.body["status"], 401);
    assert!(expired.body["data"].is_null());

    let refreshed = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh-token",
            Some(json!({ "refreshToken": refresh })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let new_access = refreshed.body["data"]["accessToken"].as_str().unwrap();
    assert_ne!(new_access, access);

    let me_again = send(
        &app,
        json_request("GET", "/api/v1/users/current-user", None, None, Some(new_access)),
    )
    .await;
    assert_eq!(me_again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;

    let access = login.cookie("accessToken").expect("access cookie");
    let refresh = login.cookie("refreshToken").expect("refresh cookie");
    for cookie in [&access, &refresh] {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));
    }
    assert!(access.contains(&format!("Max-Age={}", common::ACCESS_TTL)));
    assert!(refresh.contains(&format!("Max-Age={}", common::REFRESH_TTL)));
}

#[tokio::test]
async fn test_cookies_are_secure_in_production() {
    let ctx = common::memory_context_in(vidtube::infrastructure::config::Environment::Production);
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;

    assert!(login.cookie("accessToken").unwrap().contains("; Secure"));
    assert!(login.cookie("refreshToken").unwrap().contains("; Secure"));
}

#[tokio::test]
async fn test_cookie_session_round_trip() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;
    let access_cookie = cookie_pair(&login, "accessToken");
    let refresh_cookie = cookie_pair(&login, "refreshToken");

    let me = send(
        &app,
        json_request(
            "GET",
            "/api/v1/users/current-user",
            None,
            Some(&access_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(me.status, StatusCode::OK);

    // Empty body, token only in the cookie
    let refreshed = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh-token",
            None,
            Some(&refresh_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.cookie("accessToken").is_some());
    assert!(refreshed.cookie("refreshToken").is_some());

    // The old cookie is now stale
    let replay = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh-token",
            None,
            Some(&refresh_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_without_token_is_unauthorized() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let response = send(
        &app,
        json_request("POST", "/api/v1/auth/refresh-token", None, None, None),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Unauthorized request");
}

#[tokio::test]
async fn test_refresh_with_malformed_body_is_bad_request() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/auth/refresh-token")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_clears_cookies_and_revokes() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;
    let access_cookie = cookie_pair(&login, "accessToken");
    let refresh = login.body["data"]["refreshToken"].as_str().unwrap().to_string();

    let logout = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/logout",
            None,
            Some(&access_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["data"], json!({}));
    assert!(logout.cookie("accessToken").unwrap().contains("Max-Age=0"));
    assert!(logout.cookie("refreshToken").unwrap().contains("Max-Age=0"));

    let refreshed = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh-token",
            Some(json!({ "refreshToken": refresh })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(refreshed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_session() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let response = send(
        &app,
        json_request("POST", "/api/v1/auth/logout", None, None, None),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);
    register_and_login(&app).await;

    let wrong_password = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": "a@x.com", "password": "nope-nope" })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert!(wrong_password.cookie("accessToken").is_none());

    let unknown = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": "bob", "password": common::PASSWORD })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let no_identifier = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "password": common::PASSWORD })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(no_identifier.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password_flow() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;
    let access_cookie = cookie_pair(&login, "accessToken");

    let mismatch = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/change-password",
            Some(json!({
                "oldPassword": common::PASSWORD,
                "newPassword": "n3w-secret",
                "confirmPassword": "different"
            })),
            Some(&access_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);

    let changed = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/change-password",
            Some(json!({
                "oldPassword": common::PASSWORD,
                "newPassword": "n3w-secret",
                "confirmPassword": "n3w-secret"
            })),
            Some(&access_cookie),
            None,
        ),
    )
    .await;
    assert_eq!(changed.status, StatusCode::OK);

    let relogin = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": "alice", "password": "n3w-secret" })),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(relogin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_never_leak_secrets() {
    let ctx = common::memory_context();
    let app = common::test_app(&ctx);

    let login = register_and_login(&app).await;
    let access = login.body["data"]["accessToken"].as_str().unwrap().to_string();

    let me = send(
        &app,
        json_request("GET", "/api/v1/users/current-user", None, None, Some(&access)),
    )
    .await;

    for body in [&login.body["data"]["user"], &me.body["data"]] {
        let text = body.to_string();
        assert!(!text.contains(common::PASSWORD));
        assert!(!text.contains("argon2"));
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("refreshToken").is_none());
    }
}
