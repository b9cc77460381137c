//! Client application context.
//!
//! Owns the signed-in session and the colour theme, persisting both through a
//! [`SessionStore`]. The context is passed explicitly to whatever needs it;
//! there is no global instance.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::form::FormValues;
use crate::domain::ports::{
    LoginService, SessionStore, SessionStoreError, THEME_KEY, TOKEN_KEY, USER_KEY,
};
use crate::domain::{AuthSession, Error, LoginCredentials, Registration, SessionToken, User};

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn store_error(failure: SessionStoreError) -> Error {
    error!(error = %failure, "session store failure");
    Error::server_error(format!("session store failure: {failure}"))
}

/// Session and preference state of one client.
///
/// # Examples
/// ```no_run
/// # async fn demo(login: std::sync::Arc<dyn ci_tender::domain::ports::LoginService>)
/// #     -> Result<(), ci_tender::domain::Error> {
/// use ci_tender::domain::AppContext;
/// use ci_tender::outbound::session_store::MemorySessionStore;
///
/// let mut context = AppContext::new(login, MemorySessionStore::default());
/// context.init(false)?;
/// context.login("admin@ci-tender.ci", "admin123").await?;
/// assert!(context.is_authenticated());
/// # Ok(())
/// # }
/// ```
pub struct AppContext<S> {
    login: Arc<dyn LoginService>,
    store: S,
    session: Option<AuthSession>,
    theme: Theme,
}

impl<S: SessionStore> AppContext<S> {
    /// Signed-out context over `store`; call [`Self::init`] to restore.
    pub fn new(login: Arc<dyn LoginService>, store: S) -> Self {
        Self {
            login,
            store,
            session: None,
            theme: Theme::default(),
        }
    }

    /// Restore the session and theme from the store.
    ///
    /// A token without a user, a user without a token, or a user record that
    /// does not parse clears both keys. Without a stored theme the system
    /// preference applies.
    ///
    /// # Errors
    /// Returns `ServerError` when the store cannot be read or cleared.
    pub fn init(&mut self, system_prefers_dark: bool) -> Result<(), Error> {
        self.session = self.restore_session()?;
        let stored = self.store.get(THEME_KEY).map_err(store_error)?;
        self.theme = match stored.as_deref().and_then(Theme::from_label) {
            Some(theme) => theme,
            None if system_prefers_dark => Theme::Dark,
            None => Theme::Light,
        };
        Ok(())
    }

    fn restore_session(&mut self) -> Result<Option<AuthSession>, Error> {
        let token = self.store.get(TOKEN_KEY).map_err(store_error)?;
        let user = self.store.get(USER_KEY).map_err(store_error)?;
        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => Ok(Some(AuthSession {
                    user,
                    token: SessionToken::new(token),
                })),
                Err(err) => {
                    warn!(error = %err, "stored user is corrupted; clearing session");
                    self.clear_store()?;
                    Ok(None)
                }
            },
            _ => {
                warn!("stored session is incomplete; clearing session");
                self.clear_store()?;
                Ok(None)
            }
        }
    }

    /// Sign in and persist the session.
    ///
    /// # Errors
    /// `ValidationFailed` for blank inputs, otherwise whatever the login
    /// service returns.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password)
            .map_err(|err| Error::validation_failed(err.to_string()))?;
        let session = self.login.authenticate(&credentials).await?;
        info!(user_id = %session.user.id, "signed in");
        self.open(session)
    }

    /// Create an account from registration form values and sign in.
    ///
    /// # Errors
    /// `ValidationFailed` with per-field details for invalid values, or for
    /// an email that is already registered.
    pub async fn register(&mut self, values: &FormValues) -> Result<&User, Error> {
        let registration = Registration::try_from_values(values)?;
        let session = self.login.register(&registration).await?;
        info!(user_id = %session.user.id, "registered");
        self.open(session)
    }

    fn open(&mut self, session: AuthSession) -> Result<&User, Error> {
        let user = serde_json::to_string(&session.user)
            .map_err(|err| Error::server_error(format!("user encoding failed: {err}")))?;
        self.store
            .set(TOKEN_KEY, session.token.as_str())
            .map_err(store_error)?;
        self.store.set(USER_KEY, &user).map_err(store_error)?;
        Ok(&self.session.insert(session).user)
    }

    /// Sign out: revoke the token and forget the stored session.
    ///
    /// A failed revocation is logged; the local session is cleared anyway.
    ///
    /// # Errors
    /// Returns `ServerError` when the store cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), Error> {
        if let Some(session) = self.session.take() {
            if let Err(err) = self.login.revoke(&session.token).await {
                warn!(error = %err, "token revocation failed");
            }
            info!(user_id = %session.user.id, "signed out");
        }
        self.clear_store()
    }

    /// Release the context at shutdown; equivalent to [`Self::logout`].
    ///
    /// # Errors
    /// See [`Self::logout`].
    pub async fn teardown(&mut self) -> Result<(), Error> {
        self.logout().await
    }

    fn clear_store(&mut self) -> Result<(), Error> {
        self.store.remove(TOKEN_KEY).map_err(store_error)?;
        self.store.remove(USER_KEY).map_err(store_error)
    }

    /// Signed-in user.
    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    /// Bearer token of the signed-in user.
    pub fn token(&self) -> Option<&SessionToken> {
        self.session.as_ref().map(|session| &session.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(User::is_admin)
    }

    /// Active theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch and persist the theme.
    ///
    /// # Errors
    /// Returns `ServerError` when the store cannot be written.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), Error> {
        self.store
            .set(THEME_KEY, theme.as_str())
            .map_err(store_error)?;
        self.theme = theme;
        Ok(())
    }

    /// Flip and persist the theme, returning the new one.
    ///
    /// # Errors
    /// See [`Self::set_theme`].
    pub fn toggle_theme(&mut self) -> Result<Theme, Error> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
