use crate::application::auth::change_password::{ChangePasswordRequest, ChangePasswordUseCase};
use crate::application::auth::login::{LoginRequest, LoginUseCase};
use crate::application::auth::logout::LogoutUseCase;
use crate::application::auth::refresh::{RefreshTokenRequest, RefreshTokenUseCase};
use crate::domain::auth::TokenPair;
use crate::infrastructure::state::AppState;
use crate::presentation::cookies::{
    ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, clear_cookie, get_cookie, session_cookie,
};
use crate::presentation::dtos::{AccountResource, LoginResource, TokenResource};
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{ApiResponse, Empty};
use crate::shared::validation::ValidatedJson;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};

type SessionCookies = AppendHeaders<[(HeaderName, String); 2]>;

fn token_cookies(state: &AppState, pair: &TokenPair) -> SessionCookies {
    let secure = state.config.secure_cookies();
    AppendHeaders([
        (
            SET_COOKIE,
            session_cookie(ACCESS_COOKIE_NAME, &pair.access_token, pair.expires_in, secure),
        ),
        (
            SET_COOKIE,
            session_cookie(
                REFRESH_COOKIE_NAME,
                &pair.refresh_token,
                pair.refresh_expires_in,
                secure,
            ),
        ),
    ])
}

/// Login handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookies set", body = ApiResponse<LoginResource>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LoginUseCase::new(
        state.accounts.clone(),
        state.password_service.clone(),
        state.token_service.clone(),
    );

    let response = use_case.execute(req).await?;
    let cookies = token_cookies(&state, &response.tokens);
    let tokens = response.tokens;

    let data = LoginResource {
        user: AccountResource::from(response.account),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
    };

    Ok((cookies, ApiResponse::ok(data, "User successfully logged in")))
}

/// Refresh token handler
///
/// Reads the refresh token from the `refreshToken` cookie, or from the body.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    request_body(content = RefreshTokenRequest, description = "Optional when the refreshToken cookie is sent"),
    responses(
        (status = 200, description = "Token pair rotated, session cookies reset", body = ApiResponse<TokenResource>),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Missing, invalid, expired or superseded refresh token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body_request = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshTokenRequest::default()
    } else {
        serde_json::from_slice::<RefreshTokenRequest>(&body)
            .map_err(|e| AppError::ValidationError(format!("Invalid request body: {}", e)))?
    };

    let presented = get_cookie(&headers, REFRESH_COOKIE_NAME)
        .or(body_request.refresh_token.as_deref());

    let use_case = RefreshTokenUseCase::new(state.token_service.clone());
    let pair = use_case.execute(presented).await?;
    let cookies = token_cookies(&state, &pair);

    Ok((
        cookies,
        ApiResponse::ok(TokenResource::from(pair), "Access token refreshed"),
    ))
}

/// Logout handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out, session cookies cleared", body = ApiResponse<Empty>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    LogoutUseCase::new(state.token_service.clone())
        .execute(&auth_user.identity)
        .await?;

    let secure = state.config.secure_cookies();
    Ok((
        AppendHeaders([
            (SET_COOKIE, clear_cookie(ACCESS_COOKIE_NAME, secure)),
            (SET_COOKIE, clear_cookie(REFRESH_COOKIE_NAME, secure)),
        ]),
        ApiResponse::ok(Empty::default(), "User logged out"),
    ))
}

/// Change password handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<Empty>),
        (status = 400, description = "Validation error or confirmation mismatch", body = ErrorResponse),
        (status = 401, description = "Old password wrong or unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "auth"
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    ChangePasswordUseCase::new(state.accounts.clone(), state.password_service.clone())
        .execute(&auth_user.identity, req)
        .await?;

    Ok(ApiResponse::ok(
        Empty::default(),
        "Password is changed successfully",
    ))
}
