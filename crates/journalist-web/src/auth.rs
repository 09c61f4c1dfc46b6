//! Login credentials from the environment.

use tracing::warn;

/// Environment variable holding the login username.
pub const USERNAME_ENV: &str = "APP_USERNAME";
/// Environment variable holding the login password.
pub const PASSWORD_ENV: &str = "PASSWORD";

/// The single username/password pair allowed to log in.
///
/// Missing values never match anything, so an unconfigured server rejects
/// every login attempt.
#[derive(Clone, Default)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Read `APP_USERNAME` and `PASSWORD`, warning when either is unset.
    pub fn from_env() -> Self {
        let username = std::env::var(USERNAME_ENV).ok();
        let password = std::env::var(PASSWORD_ENV).ok();
        if username.is_none() || password.is_none() {
            warn!("{USERNAME_ENV} or {PASSWORD_ENV} is not set; every login will be rejected");
        }
        Self { username, password }
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Exact string comparison of both fields.
    pub fn check(&self, username: &str, password: &str) -> bool {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => u == username && p == password,
            _ => false,
        }
    }
}
