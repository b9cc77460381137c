//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`RecordFacade`, `LoginService`, `AdPlacements`) are called
//! by inbound adapters. Driven ports (`RecordRepository`, `SessionStore`) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod ad_placements;
mod login_service;
mod record_facade;
mod record_repository;
mod session_store;

pub use ad_placements::AdPlacements;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
pub use record_facade::{Facets, ListQuery, RecordFacade};
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{RecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError, THEME_KEY, TOKEN_KEY, USER_KEY};
