//! Auth route handlers.
//!
//! Thin wrappers over the platform's auth endpoints. The platform owns
//! identity entirely; on success the storefront caches the profile and the
//! platform session cookie in its own session.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use polar_scoop_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_login, establish_login, platform_session};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data (step one).
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// OTP confirmation form data (step two).
#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    pub email: String,
    pub otp: String,
}

/// Forgot-password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset-password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub message: String,
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Log in and establish the storefront session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<CurrentUser>> {
    let email = parse_email(&form.email)?;

    let (profile, platform) = state.platform().login(&email, &form.password).await?;

    set_sentry_user(&profile.id, Some(profile.email.as_str()));
    establish_login(&session, profile.clone(), &platform).await?;

    Ok(Json(CurrentUser::from(profile)))
}

/// Start registration; the platform emails an OTP.
#[instrument(skip(state, form))]
pub async fn register_initiate(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<Json<MessageView>> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    let email = parse_email(&form.email)?;

    let message = state
        .platform()
        .register_initiate(form.name.trim(), &email, &form.password)
        .await?;

    Ok(Json(MessageView { message }))
}

/// Confirm the OTP; on success the user is logged in.
#[instrument(skip(state, session, form))]
pub async fn register_verify(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<VerifyForm>,
) -> Result<Json<CurrentUser>> {
    let email = parse_email(&form.email)?;

    let (profile, platform) = state.platform().register_verify(&email, &form.otp).await?;

    set_sentry_user(&profile.id, Some(profile.email.as_str()));
    establish_login(&session, profile.clone(), &platform).await?;

    Ok(Json(CurrentUser::from(profile)))
}

/// Request a password-reset email.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<ForgotPasswordForm>,
) -> Result<Json<MessageView>> {
    let email = parse_email(&form.email)?;
    let message = state.platform().forgot_password(&email).await?;
    Ok(Json(MessageView { message }))
}

/// Complete a password reset.
#[instrument(skip(state, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(form): Json<ResetPasswordForm>,
) -> Result<Json<MessageView>> {
    let message = state
        .platform()
        .reset_password(&form.token, &form.password)
        .await?;
    Ok(Json(MessageView { message }))
}

/// Refresh the cached profile from the platform.
#[instrument(skip(state, session, login))]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
    RequireUser(login): RequireUser,
) -> Result<Json<CurrentUser>> {
    let profile = state.platform().me(&login.platform).await?;

    // Keep the session copy in sync (role or vendor status may have changed)
    establish_login(&session, profile.clone(), &login.platform).await?;

    Ok(Json(CurrentUser::from(profile)))
}

/// Log out: best-effort platform logout, then drop the whole session.
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<MessageView>> {
    if let Some(platform) = platform_session(&session).await?
        && let Err(e) = state.platform().logout(&platform).await
    {
        // The local session dies either way; the platform one will expire
        tracing::warn!("Platform logout failed: {e}");
    }

    clear_login(&session).await?;
    clear_sentry_user();

    Ok(Json(MessageView {
        message: "Logged out".to_string(),
    }))
}
