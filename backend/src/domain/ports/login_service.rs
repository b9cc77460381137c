//! Driving port for authentication use-cases.
//!
//! Inbound adapters and the client application context call it to sign
//! users in and out without knowing where accounts live.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration, SessionToken, User};

/// Account and session operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and open a session.
    ///
    /// Unknown emails and wrong passwords yield `Unauthorized`; accounts
    /// that are not active yield `Forbidden`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Create an account and open a session; a taken email yields
    /// `ValidationFailed`.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error>;

    /// User owning `token`; unknown tokens yield `Unauthorized`.
    async fn resolve(&self, token: &SessionToken) -> Result<User, Error>;

    /// Close the session identified by `token`. Unknown tokens are ignored.
    async fn revoke(&self, token: &SessionToken) -> Result<(), Error>;
}
