//! Driven port for client-side session persistence.
//!
//! Mirrors browser local storage: string values under string keys.

use super::define_port_error;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the signed-in user as JSON.
pub const USER_KEY: &str = "user";
/// Key holding the colour theme.
pub const THEME_KEY: &str = "theme";

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// The key cannot be stored by this adapter.
        InvalidKey { key: String } => "invalid session key: {key}",
        /// Reading or writing the backing medium failed.
        Io { message: String } => "session store I/O failed: {message}",
    }
}

/// String key-value storage.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Remove `key`; absent keys are ignored.
    fn remove(&mut self, key: &str) -> Result<(), SessionStoreError>;
}
