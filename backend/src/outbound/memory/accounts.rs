//! In-memory [`LoginService`] adapter.
//!
//! Accounts are [`User`] records kept in a shared [`InMemoryRecordStore`] so
//! the admin user listing sees registrations. Passwords are stored as salted
//! SHA-256 digests keyed by user id next to the store; tokens are random
//! UUIDs. Emails and account status are always read from the user store, so
//! edits and deletions made through the record facade apply to sign-in.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::InMemoryRecordStore;
use crate::domain::ports::{LoginService, RecordRepository, RecordRepositoryError};
use crate::domain::{
    AuthSession, Error, LoginCredentials, Record, RecordId, Registration, SessionToken, User,
    UserInput, UserRole,
};

const SALT_LEN: usize = 16;

#[derive(Debug, Clone)]
struct Credential {
    salt: String,
    digest: String,
}

impl Credential {
    fn new(password: &str) -> Self {
        let salt = hex::encode(rand::random::<[u8; SALT_LEN]>());
        let digest = digest(&salt, password);
        Self { salt, digest }
    }

    fn verify(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.digest
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Default)]
struct AccountState {
    credentials: HashMap<RecordId, Credential>,
    tokens: HashMap<String, RecordId>,
}

fn store_error(failure: RecordRepositoryError) -> Error {
    error!(error = %failure, "account store failure");
    Error::server_error(format!("account store error: {failure}"))
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid email or password")
}

/// Accounts and sessions held in process memory.
pub struct InMemoryAccounts {
    users: InMemoryRecordStore<User>,
    state: RwLock<AccountState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryAccounts {
    /// Accounts backed by `users`, stamping logins with `clock`.
    pub fn new(users: InMemoryRecordStore<User>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            state: RwLock::new(AccountState::default()),
            clock,
        }
    }

    /// Create an administrator account unless the email is taken.
    ///
    /// # Errors
    /// `ValidationFailed` when the email is already registered.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<User, Error> {
        let input = UserInput {
            email: Some(email.trim().to_lowercase()),
            first_name: Some("Admin".to_owned()),
            last_name: Some("CI-Tender".to_owned()),
            role: Some(UserRole::Admin),
            ..UserInput::default()
        };
        let user = self.create_account(input, password).await?;
        info!(user_id = %user.id, "administrator account created");
        Ok(user)
    }

    async fn create_account(&self, input: UserInput, password: &str) -> Result<User, Error> {
        let user = User::build(RecordId::random(), input, self.clock.utc());
        let mut state = self.state.write().await;
        let existing = self.users.all().await.map_err(store_error)?;
        if existing
            .iter()
            .any(|other| other.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::validation_failed("email already registered")
                .with_details(json!({ "fields": { "email": ["taken"] } })));
        }
        // Drop credentials of users deleted through the record facade.
        state
            .credentials
            .retain(|id, _| existing.iter().any(|other| other.id == *id));
        self.users.insert(user.clone()).await.map_err(store_error)?;
        state.credentials.insert(user.id, Credential::new(password));
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let users = self.users.all().await.map_err(store_error)?;
        Ok(users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    async fn forget_token(&self, token: &SessionToken) {
        self.state.write().await.tokens.remove(token.as_str());
    }

    async fn open_session(&self, user: User) -> AuthSession {
        let token = SessionToken::new(Uuid::new_v4().to_string());
        self.state
            .write()
            .await
            .tokens
            .insert(token.as_str().to_owned(), user.id);
        AuthSession { user, token }
    }
}

#[async_trait]
impl LoginService for InMemoryAccounts {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Some(mut user) = self.find_by_email(credentials.email()).await? else {
            warn!("rejected sign-in attempt");
            return Err(invalid_credentials());
        };
        let verified = self
            .state
            .read()
            .await
            .credentials
            .get(&user.id)
            .is_some_and(|credential| credential.verify(credentials.password()));
        if !verified {
            warn!("rejected sign-in attempt");
            return Err(invalid_credentials());
        }
        if !user.is_active() {
            return Err(Error::forbidden(format!("account is {}", user.status)));
        }
        user.last_login = Some(self.clock.utc());
        self.users
            .replace(user.clone())
            .await
            .map_err(store_error)?;
        info!(user_id = %user.id, "user signed in");
        Ok(self.open_session(user).await)
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error> {
        let input = UserInput {
            email: Some(registration.email().to_owned()),
            first_name: Some(registration.first_name().to_owned()),
            last_name: Some(registration.last_name().to_owned()),
            company: registration.company().map(str::to_owned),
            phone_number: registration.phone_number().map(str::to_owned),
            role: Some(UserRole::User),
            ..UserInput::default()
        };
        let user = self.create_account(input, registration.password()).await?;
        info!(user_id = %user.id, "account registered");
        Ok(self.open_session(user).await)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<User, Error> {
        let user_id = self.state.read().await.tokens.get(token.as_str()).copied();
        let Some(user_id) = user_id else {
            return Err(Error::unauthorized("unknown or expired session"));
        };
        let Some(user) = self.users.find(user_id).await.map_err(store_error)? else {
            self.forget_token(token).await;
            return Err(Error::unauthorized("unknown or expired session"));
        };
        if !user.is_active() {
            self.forget_token(token).await;
            warn!(%user_id, "session of an inactive account dropped");
            return Err(Error::forbidden(format!("account is {}", user.status)));
        }
        Ok(user)
    }

    async fn revoke(&self, token: &SessionToken) -> Result<(), Error> {
        if let Some(user_id) = self.state.write().await.tokens.remove(token.as_str()) {
            info!(%user_id, "session revoked");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::FormValues;
    use crate::domain::{ErrorCode, UserStatus};
    use crate::test_support::FixtureClock;
    use rstest::{fixture, rstest};

    const ADMIN_EMAIL: &str = "admin@ci-tender.ci";
    const ADMIN_PASSWORD: &str = "admin123";

    #[fixture]
    fn accounts() -> InMemoryAccounts {
        InMemoryAccounts::new(InMemoryRecordStore::default(), Arc::new(FixtureClock::default()))
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid credentials")
    }

    fn registration(email: &str) -> Registration {
        Registration::try_from_values(&FormValues::from_iter([
            ("firstName", "Awa"),
            ("lastName", "Koné"),
            ("email", email),
            ("password", "Abcdefg1"),
        ]))
        .expect("valid registration")
    }

    #[rstest]
    #[tokio::test]
    async fn admin_signs_in_and_resolves(accounts: InMemoryAccounts) {
        accounts
            .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("bootstrap");
        let session = accounts
            .authenticate(&credentials("Admin@CI-Tender.ci", ADMIN_PASSWORD))
            .await
            .expect("sign in");
        assert!(session.user.is_admin());
        assert!(session.user.last_login.is_some());

        let resolved = accounts.resolve(&session.token).await.expect("resolve");
        assert_eq!(resolved.id, session.user.id);

        accounts.revoke(&session.token).await.expect("revoke");
        let err = accounts.resolve(&session.token).await.expect_err("revoked");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(ADMIN_EMAIL, "wrong")]
    #[case("nobody@ci-tender.ci", ADMIN_PASSWORD)]
    #[tokio::test]
    async fn bad_credentials_are_unauthorized(
        accounts: InMemoryAccounts,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        accounts
            .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("bootstrap");
        let err = accounts
            .authenticate(&credentials(email, password))
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn suspended_accounts_are_forbidden(accounts: InMemoryAccounts) {
        let session = accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect("register");
        let mut user = session.user;
        user.status = UserStatus::Suspended;
        accounts.users.replace(user).await.expect("suspend");

        let err = accounts
            .authenticate(&credentials("awa@example.ci", "Abcdefg1"))
            .await
            .expect_err("suspended");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_registration_fails_validation(accounts: InMemoryAccounts) {
        accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect("first registration");
        let err = accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(accounts.users.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn suspending_an_account_ends_its_sessions(accounts: InMemoryAccounts) {
        let session = accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect("register");
        let mut user = session.user.clone();
        user.status = UserStatus::Suspended;
        accounts.users.replace(user.clone()).await.expect("suspend");

        let err = accounts.resolve(&session.token).await.expect_err("suspended");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        user.status = UserStatus::Active;
        accounts.users.replace(user).await.expect("reactivate");
        let err = accounts.resolve(&session.token).await.expect_err("token dropped");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_accounts_free_their_email(accounts: InMemoryAccounts) {
        let first = accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect("first registration");
        assert!(accounts.users.remove(first.user.id).await.expect("delete"));

        let err = accounts.resolve(&first.token).await.expect_err("deleted");
        assert_eq!(err.code(), ErrorCode::Unauthorized);

        let second = accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect("email is free again");
        assert_ne!(second.user.id, first.user.id);
        assert_eq!(accounts.state.read().await.credentials.len(), 1);
        accounts
            .authenticate(&credentials("awa@example.ci", "Abcdefg1"))
            .await
            .expect("sign in with the new account");
    }

    #[rstest]
    #[tokio::test]
    async fn sign_in_follows_email_changes(accounts: InMemoryAccounts) {
        let session = accounts
            .register(&registration("awa@example.ci"))
            .await
            .expect("register");
        let mut user = session.user;
        user.email = "awa.kone@example.ci".to_owned();
        accounts.users.replace(user).await.expect("change email");

        let err = accounts
            .authenticate(&credentials("awa@example.ci", "Abcdefg1"))
            .await
            .expect_err("old email");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        accounts
            .authenticate(&credentials("awa.kone@example.ci", "Abcdefg1"))
            .await
            .expect("new email signs in");
    }

    #[rstest]
    fn digests_are_salted() {
        let first = Credential::new("secret");
        let second = Credential::new("secret");
        assert_ne!(first.digest, second.digest);
        assert!(first.verify("secret"));
        assert!(!first.verify("Secret"));
    }
}
