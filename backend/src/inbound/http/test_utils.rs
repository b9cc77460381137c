//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::Clock;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::state::HttpState;
use crate::domain::ports::{LoginService, MockLoginService};
use crate::domain::{
    AdRotationService, Advertisement, Record, RecordId, RecordService, Supplier, Tender, User,
    UserInput, UserRole,
};
use crate::outbound::memory::InMemoryRecordStore;
use crate::test_support::FixtureClock;

/// Administrator account used by handler tests.
pub fn admin_user() -> User {
    user_with_role(UserRole::Admin)
}

/// Account with `role`.
pub fn user_with_role(role: UserRole) -> User {
    let input = UserInput {
        email: Some(format!("{role}@ci-tender.ci")),
        first_name: Some("Awa".to_owned()),
        last_name: Some("Koné".to_owned()),
        role: Some(role),
        ..UserInput::default()
    };
    User::build(RecordId::random(), input, FixtureClock::default().utc())
}

/// In-memory stores and a mocked login service behind an [`HttpState`].
pub struct TestPorts {
    pub clock: FixtureClock,
    pub login: Arc<dyn LoginService>,
    pub tenders: InMemoryRecordStore<Tender>,
    pub suppliers: InMemoryRecordStore<Supplier>,
    pub users: InMemoryRecordStore<User>,
    pub advertisements: InMemoryRecordStore<Advertisement>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            clock: FixtureClock::default(),
            login: Arc::new(MockLoginService::new()),
            tenders: InMemoryRecordStore::default(),
            suppliers: InMemoryRecordStore::default(),
            users: InMemoryRecordStore::default(),
            advertisements: InMemoryRecordStore::default(),
        }
    }
}

impl TestPorts {
    /// Replace the login service.
    pub fn with_login(mut self, login: MockLoginService) -> Self {
        self.login = Arc::new(login);
        self
    }

    /// Assemble the handler state.
    pub fn into_state(self) -> HttpState {
        let clock: Arc<dyn Clock> = Arc::new(self.clock);
        HttpState {
            login: self.login,
            tenders: Arc::new(RecordService::<Tender, _>::new(
                Arc::new(self.tenders),
                clock.clone(),
            )),
            suppliers: Arc::new(RecordService::<Supplier, _>::new(
                Arc::new(self.suppliers),
                clock.clone(),
            )),
            users: Arc::new(RecordService::<User, _>::new(
                Arc::new(self.users),
                clock.clone(),
            )),
            advertisements: Arc::new(RecordService::<Advertisement, _>::new(
                Arc::new(self.advertisements.clone()),
                clock.clone(),
            )),
            placements: Arc::new(AdRotationService::with_rng(
                Arc::new(self.advertisements),
                clock,
                SmallRng::seed_from_u64(7),
            )),
        }
    }
}
