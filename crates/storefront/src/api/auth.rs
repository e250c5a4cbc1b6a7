//! Authentication endpoints.
//!
//! Registration is a two-step OTP flow: `register_initiate` sends a code to
//! the email, `register_verify` confirms it and establishes the session.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use polar_scoop_core::Email;

use super::types::UserProfile;
use super::{ApiError, PlatformClient, PlatformSession};

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterInitiateBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterVerifyBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Serialize)]
struct ForgotPasswordBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordBody<'a> {
    token: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: String,
}

impl PlatformClient {
    /// Log in with email and password.
    ///
    /// Returns the profile and the platform session cookie to replay on
    /// authenticated calls.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on bad credentials or when the
    /// platform fails to set a session cookie.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<(UserProfile, PlatformSession), ApiError> {
        let req = self.request(Method::POST, "/auth/login").json(&LoginBody {
            email: email.as_str(),
            password,
        });

        let (envelope, session): (UserEnvelope, _) = self.execute_capturing_session(req).await?;
        Ok((envelope.user, session))
    }

    /// Start registration; the platform emails an OTP to the address.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the request
    /// fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register_initiate(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<String, ApiError> {
        let req = self
            .request(Method::POST, "/auth/register-initiate")
            .json(&RegisterInitiateBody {
                name,
                email: email.as_str(),
                password,
            });

        let envelope: MessageEnvelope = self.execute(req).await?;
        Ok(envelope.message)
    }

    /// Confirm the OTP and establish the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on a wrong or expired code.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn register_verify(
        &self,
        email: &Email,
        otp: &str,
    ) -> Result<(UserProfile, PlatformSession), ApiError> {
        let req = self
            .request(Method::POST, "/auth/register-verify")
            .json(&RegisterVerifyBody {
                email: email.as_str(),
                otp,
            });

        let (envelope, session): (UserEnvelope, _) = self.execute_capturing_session(req).await?;
        Ok((envelope.user, session))
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &Email) -> Result<String, ApiError> {
        let req = self
            .request(Method::POST, "/auth/forgot-password")
            .json(&ForgotPasswordBody {
                email: email.as_str(),
            });

        let envelope: MessageEnvelope = self.execute(req).await?;
        Ok(envelope.message)
    }

    /// Complete a password reset with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired.
    #[instrument(skip(self, token, password))]
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        let req = self
            .request(Method::POST, "/auth/reset-password")
            .json(&ResetPasswordBody { token, password });

        let envelope: MessageEnvelope = self.execute(req).await?;
        Ok(envelope.message)
    }

    /// Fetch the authenticated profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the session has expired.
    #[instrument(skip(self, session))]
    pub async fn me(&self, session: &PlatformSession) -> Result<UserProfile, ApiError> {
        let req = Self::with_session(self.request(Method::GET, "/auth/me"), Some(session));
        let envelope: UserEnvelope = self.execute(req).await?;
        Ok(envelope.user)
    }

    /// Invalidate the platform session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; callers typically log and
    /// discard it, since the local session is cleared regardless.
    #[instrument(skip(self, session))]
    pub async fn logout(&self, session: &PlatformSession) -> Result<(), ApiError> {
        let req = Self::with_session(self.request(Method::POST, "/auth/logout"), Some(session));
        let _: MessageEnvelope = self.execute(req).await?;
        Ok(())
    }
}
