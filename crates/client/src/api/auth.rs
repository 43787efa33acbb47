//! Login and registration endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use shopfront_core::session::{AdminLoginResponse, UserSession};
use tracing::instrument;

use super::{ApiClient, ApiError, Scope};

/// Username and password entered at a login prompt.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remember_me: Option<bool>,
}

impl<'a> LoginBody<'a> {
    fn new(credentials: &'a Credentials, remember_me: Option<bool>) -> Self {
        Self {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
            remember_me,
        }
    }
}

impl ApiClient {
    /// Sign in a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserSession, ApiError> {
        let body = LoginBody::new(credentials, None);
        self.send_json(Method::POST, "auth/login", Scope::Customer, &body)
            .await
    }

    /// Create a customer account; the backend signs the new user in.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn register(&self, credentials: &Credentials) -> Result<UserSession, ApiError> {
        let body = LoginBody::new(credentials, None);
        self.send_json(Method::POST, "auth/register", Scope::Customer, &body)
            .await
    }

    /// Sign in an administrator. The role is not checked here.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn admin_login(
        &self,
        credentials: &Credentials,
        remember_me: bool,
    ) -> Result<AdminLoginResponse, ApiError> {
        let body = LoginBody::new(credentials, Some(remember_me));
        self.send_json(Method::POST, "auth/admin-login", Scope::Admin, &body)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("ada", "hunter2-but-longer");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("ada"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_admin_login_body_shape() {
        let credentials = Credentials::new("root", "pw");
        let body = serde_json::to_value(LoginBody::new(&credentials, Some(true))).unwrap();
        assert_eq!(body["username"], "root");
        assert_eq!(body["password"], "pw");
        assert_eq!(body["rememberMe"], true);

        let body = serde_json::to_value(LoginBody::new(&credentials, None)).unwrap();
        assert!(body.get("rememberMe").is_none());
    }
}
