//! HTTP Handlers

use axum::extract::State;
use kernel::extract::ValidatedJson;
use kernel::response::ApiResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, DeleteAccountUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{AuthoredContent, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, SessionResponse, TokenResponse,
    UpdateProfileRequest, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<R, C> {
    pub repo: Arc<R>,
    /// Where a rename is propagated
    pub content: Arc<C>,
    pub config: Arc<AuthConfig>,
}

impl<R, C> Clone for AuthAppState<R, C> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            content: self.content.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, C>(
    State(state): State<AuthAppState<R, C>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AuthResult<ApiResponse<SessionResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    C: AuthoredContent + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        username: req.username.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    let output = use_case.execute(input).await?;

    Ok(ApiResponse::created(SessionResponse {
        user: (&output.user).into(),
        token: output.token,
    })
    .with_message("Registration successful"))
}

/// POST /api/auth/login
pub async fn login<R, C>(
    State(state): State<AuthAppState<R, C>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AuthResult<ApiResponse<SessionResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    C: AuthoredContent + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            login: req.login.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::ok(SessionResponse {
        user: (&output.user).into(),
        token: output.token,
    })
    .with_message("Login successful"))
}

// ============================================================================
// Account
// ============================================================================

/// GET /api/auth/me
pub async fn me(current: CurrentUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(UserResponse {
        user: current.user().into(),
    })
}

/// PATCH /api/auth/update-profile
pub async fn update_profile<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    C: AuthoredContent + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone(), state.content.clone());

    let user = use_case
        .execute(UpdateProfileInput {
            user_id: *current.id(),
            username: req.username,
            email: req.email,
        })
        .await?;

    Ok(ApiResponse::ok(UserResponse { user: (&user).into() })
        .with_message("Profile updated successfully"))
}

/// PATCH /api/auth/change-password
pub async fn change_password<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AuthResult<ApiResponse<TokenResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    C: AuthoredContent + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(ChangePasswordInput {
            user_id: *current.id(),
            current_password: req.currentPassword.unwrap_or_default(),
            new_password: req.newPassword.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::ok(TokenResponse {
        token: output.token,
    })
    .with_message("Password changed successfully"))
}

/// DELETE /api/auth/delete-account
pub async fn delete_account<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
) -> AuthResult<ApiResponse<()>>
where
    R: UserRepository + Send + Sync + 'static,
    C: AuthoredContent + Send + Sync + 'static,
{
    DeleteAccountUseCase::new(state.repo.clone())
        .execute(current.id())
        .await?;

    Ok(ApiResponse::message("Account deleted successfully"))
}
