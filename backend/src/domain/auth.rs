//! Authentication primitives: credentials, registrations and sessions.
//!
//! Inbound payloads are validated here before a handler talks to the
//! [`LoginService`](crate::domain::ports::LoginService) port.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::User;
use crate::domain::form::{FormValues, schemas};
use crate::domain::validation::FieldViolations;

/// Error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use ci_tender::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@CI-Tender.ci ", "admin123")
///     .expect("valid credentials");
/// assert_eq!(creds.email(), "admin@ci-tender.ci");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Errors
    /// Returns [`LoginValidationError`] when either part is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for lookups.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    company: Option<String>,
    password: Zeroizing<String>,
}

impl Registration {
    /// Check registration values and extract the account fields.
    ///
    /// Confirmation fields are not required; the registration screen checks
    /// them before submitting.
    ///
    /// # Errors
    /// Returns the violations of every failing field.
    pub fn try_from_values(values: &FormValues) -> Result<Self, FieldViolations> {
        schemas::registration_request().check(values)?;
        let text = |name: &str| values.text(name).map(str::to_owned);
        Ok(Self {
            first_name: text("firstName").unwrap_or_default(),
            last_name: text("lastName").unwrap_or_default(),
            email: text("email").unwrap_or_default().trim().to_lowercase(),
            phone_number: text("phoneNumber"),
            company: text("company"),
            password: Zeroizing::new(text("password").unwrap_or_default()),
        })
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Optional phone number.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Optional company name.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Chosen password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque bearer token issued on sign-in.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token text for headers and storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Signed-in user together with their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Account that signed in.
    pub user: User,
    /// Token to send as `Authorization: Bearer <token>`.
    pub token: SessionToken,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("user@example.ci", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_kept() {
        let creds = LoginCredentials::try_from_parts("a@b.ci", " pw ").expect("valid inputs");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn registration_extracts_optional_fields() {
        let values = FormValues::from_iter([
            ("firstName", "Awa"),
            ("lastName", "Koné"),
            ("email", "Awa@Example.ci"),
            ("phoneNumber", ""),
            ("company", "Koné & Fils"),
            ("password", "Abcdefg1"),
        ]);
        let registration = Registration::try_from_values(&values).expect("valid registration");
        assert_eq!(registration.email(), "awa@example.ci");
        assert_eq!(registration.phone_number(), None);
        assert_eq!(registration.company(), Some("Koné & Fils"));
    }

    #[rstest]
    fn registration_rejects_weak_passwords() {
        let values = FormValues::from_iter([
            ("firstName", "Awa"),
            ("lastName", "Koné"),
            ("email", "awa@example.ci"),
            ("password", "abcdefgh"),
        ]);
        let violations = Registration::try_from_values(&values).expect_err("weak password");
        assert_eq!(violations.fields().collect::<Vec<_>>(), vec!["password"]);
    }

    #[rstest]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("secret-token");
        assert_eq!(format!("{token:?}"), "SessionToken(..)");
    }
}
