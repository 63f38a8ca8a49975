use crate::application::accounts::media::{UpdateAvatarRequest, UpdateCoverImageRequest};
use crate::application::accounts::register::RegisterAccountRequest;
use crate::application::accounts::update::UpdateAccountRequest;
use crate::application::auth::change_password::ChangePasswordRequest;
use crate::application::auth::login::LoginRequest;
use crate::application::auth::refresh::RefreshTokenRequest;
use crate::presentation::dtos::{AccountResource, LoginResource, TokenResource};
use crate::shared::error::ErrorResponse;
use crate::shared::response::{ApiResponse, Empty};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VidTube API",
        version = "0.1.0",
        description = "Video platform backend: accounts and cookie-based sessions with rotating refresh tokens.\n\nEvery response uses the `{status, data, message}` envelope."
    ),
    paths(
        crate::presentation::handlers::accounts::register,
        crate::presentation::handlers::accounts::current_account,
        crate::presentation::handlers::accounts::update_account,
        crate::presentation::handlers::accounts::update_avatar,
        crate::presentation::handlers::accounts::update_cover_image,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::refresh_token,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::auth::change_password,
    ),
    components(
        schemas(
            // Requests
            RegisterAccountRequest,
            UpdateAccountRequest,
            UpdateAvatarRequest,
            UpdateCoverImageRequest,
            LoginRequest,
            RefreshTokenRequest,
            ChangePasswordRequest,

            // Resources
            AccountResource,
            LoginResource,
            TokenResource,
            Empty,

            // Envelopes
            ApiResponse<AccountResource>,
            ApiResponse<LoginResource>,
            ApiResponse<TokenResource>,
            ApiResponse<Empty>,
            ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Session endpoints"),
        (name = "users", description = "Account endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
