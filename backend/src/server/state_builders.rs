//! Assembly of the in-memory adapters behind the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use ci_tender::domain::{
    AdRotationService, Advertisement, RecordService, Supplier, Tender, User,
};
use ci_tender::inbound::http::state::HttpState;
use ci_tender::outbound::memory::{InMemoryAccounts, InMemoryRecordStore};

/// Handler state plus the account adapter, kept for bootstrapping.
pub(crate) struct BuiltState {
    pub(crate) http: HttpState,
    pub(crate) accounts: Arc<InMemoryAccounts>,
}

/// Wire every port to its in-memory adapter.
///
/// The user store is shared between the account service and the user
/// facade; the advertisement store between the facade and the rotation.
pub(crate) fn build_http_state() -> BuiltState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = InMemoryRecordStore::<User>::default();
    let advertisements = InMemoryRecordStore::<Advertisement>::default();
    let accounts = Arc::new(InMemoryAccounts::new(users.clone(), clock.clone()));

    let http = HttpState {
        login: accounts.clone(),
        tenders: Arc::new(RecordService::<Tender, _>::new(
            Arc::new(InMemoryRecordStore::<Tender>::default()),
            clock.clone(),
        )),
        suppliers: Arc::new(RecordService::<Supplier, _>::new(
            Arc::new(InMemoryRecordStore::<Supplier>::default()),
            clock.clone(),
        )),
        users: Arc::new(RecordService::<User, _>::new(Arc::new(users), clock.clone())),
        advertisements: Arc::new(RecordService::<Advertisement, _>::new(
            Arc::new(advertisements.clone()),
            clock.clone(),
        )),
        placements: Arc::new(AdRotationService::new(Arc::new(advertisements), clock)),
    };
    BuiltState { http, accounts }
}
