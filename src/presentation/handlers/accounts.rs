use crate::application::accounts::get::GetAccountUseCase;
use crate::application::accounts::media::{
    MediaKind, UpdateAvatarRequest, UpdateCoverImageRequest, UpdateMediaUseCase,
};
use crate::application::accounts::register::{RegisterAccountRequest, RegisterAccountUseCase};
use crate::application::accounts::update::{UpdateAccountRequest, UpdateAccountUseCase};
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::AccountResource;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountResource>),
        (status = 400, description = "Validation or upload error", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RegisterAccountUseCase::new(
        state.accounts.clone(),
        state.password_service.clone(),
        state.media_storage.clone(),
    );

    let account = use_case.execute(req).await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        AccountResource::from(account),
        "User registered successfully",
    ))
}

/// Get the logged-in account
#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<AccountResource>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn current_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let account = GetAccountUseCase::new(state.accounts.clone())
        .execute(auth_user.identity.id)
        .await?;

    Ok(ApiResponse::ok(
        AccountResource::from(account),
        "Current user fetched successfully",
    ))
}

/// Update full name and/or email
#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<AccountResource>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn update_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = UpdateAccountUseCase::new(state.accounts.clone())
        .execute(auth_user.identity.id, req)
        .await?;

    Ok(ApiResponse::ok(
        AccountResource::from(account),
        "Account details updated successfully",
    ))
}

/// Replace the avatar
#[utoipa::path(
    patch,
    path = "/api/v1/users/avatar",
    request_body = UpdateAvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = ApiResponse<AccountResource>),
        (status = 400, description = "Missing avatar or upload error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateAvatarRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = UpdateMediaUseCase::new(state.accounts.clone(), state.media_storage.clone())
        .execute(auth_user.identity.id, MediaKind::Avatar, req.avatar.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        AccountResource::from(account),
        "Avatar image updated successfully",
    ))
}

/// Replace the cover image
#[utoipa::path(
    patch,
    path = "/api/v1/users/cover-image",
    request_body = UpdateCoverImageRequest,
    responses(
        (status = 200, description = "Cover image updated", body = ApiResponse<AccountResource>),
        (status = 400, description = "Missing cover image or upload error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateCoverImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = UpdateMediaUseCase::new(state.accounts.clone(), state.media_storage.clone())
        .execute(
            auth_user.identity.id,
            MediaKind::CoverImage,
            req.cover_image.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(
        AccountResource::from(account),
        "Cover image updated successfully",
    ))
}
