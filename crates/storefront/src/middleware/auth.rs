//! Authentication extractors and role guards.
//!
//! Guards express client-side allowance only: the platform re-checks
//! authority on every call. A failed guard redirects navigations silently
//! (to login when logged out, home on a role mismatch) and answers
//! API-style requests with a bare status code.

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::api::{PlatformSession, types::UserProfile};
use crate::models::{CurrentUser, session_keys};

/// A logged-in shopper: the cached identity plus the platform credential to
/// replay on authenticated calls.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// Cached identity.
    pub user: CurrentUser,
    /// Platform session cookie.
    pub platform: PlatformSession,
}

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(login): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", login.user.name)
/// }
/// ```
pub struct RequireUser(pub LoginState);

/// Extractor that requires the vendor dashboard role (vendor or admin).
pub struct RequireVendor(pub LoginState);

/// Extractor that requires the admin role.
pub struct RequireAdmin(pub LoginState);

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this never rejects the request.
pub struct OptionalUser(pub Option<CurrentUser>);

/// Rejection when a guard fails.
pub enum AuthRejection {
    /// Not logged in; send the navigation to the login page.
    RedirectToLogin,
    /// Role mismatch; silent redirect home.
    RedirectHome,
    /// Not logged in, API-style request.
    Unauthorized,
    /// Role mismatch, API-style request.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Whether a failed guard should redirect rather than return a status code.
///
/// GET requests are navigations; everything else is a programmatic call.
fn is_navigation(parts: &Parts) -> bool {
    parts.method == Method::GET
}

async fn login_state(parts: &Parts) -> Option<LoginState> {
    let session = parts.extensions.get::<Session>()?;

    let user: CurrentUser = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()?;
    let platform: PlatformSession = session
        .get(session_keys::PLATFORM_SESSION)
        .await
        .ok()
        .flatten()?;

    Some(LoginState { user, platform })
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match login_state(parts).await {
            Some(login) => Ok(Self(login)),
            None if is_navigation(parts) => Err(AuthRejection::RedirectToLogin),
            None => Err(AuthRejection::Unauthorized),
        }
    }
}

impl<S> FromRequestParts<S> for RequireVendor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(login) = RequireUser::from_request_parts(parts, state).await?;
        if login.user.role.can_vend() {
            Ok(Self(login))
        } else if is_navigation(parts) {
            Err(AuthRejection::RedirectHome)
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(login) = RequireUser::from_request_parts(parts, state).await?;
        if login.user.role.is_admin() {
            Ok(Self(login))
        } else if is_navigation(parts) {
            Err(AuthRejection::RedirectHome)
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(login_state(parts).await.map(|l| l.user)))
    }
}

/// Store the identity and platform credential after login or OTP verify.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish_login(
    session: &Session,
    profile: UserProfile,
    platform: &PlatformSession,
) -> Result<(), tower_sessions::session::Error> {
    let user = CurrentUser::from(profile);
    session.insert(session_keys::CURRENT_USER, &user).await?;
    session
        .insert(session_keys::PLATFORM_SESSION, platform)
        .await
}

/// Drop the whole session on logout, cart included.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_login(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// The platform credential for the current session, if logged in.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn platform_session(
    session: &Session,
) -> Result<Option<PlatformSession>, tower_sessions::session::Error> {
    session.get(session_keys::PLATFORM_SESSION).await
}
