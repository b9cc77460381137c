//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AdPlacements, LoginService, RecordFacade};
use crate::domain::{Advertisement, Record, Supplier, Tender, User};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account and session service.
    pub login: Arc<dyn LoginService>,
    /// Tender facade.
    pub tenders: Arc<dyn RecordFacade<Tender>>,
    /// Supplier facade.
    pub suppliers: Arc<dyn RecordFacade<Supplier>>,
    /// User facade.
    pub users: Arc<dyn RecordFacade<User>>,
    /// Advertisement facade.
    pub advertisements: Arc<dyn RecordFacade<Advertisement>>,
    /// Advertisement rotation.
    pub placements: Arc<dyn AdPlacements>,
}

/// Selects the facade serving one record family.
pub trait FacadeFor<R: Record> {
    /// Facade for `R`.
    fn facade(&self) -> &dyn RecordFacade<R>;
}

macro_rules! facade_for {
    ($record:ty => $field:ident) => {
        impl FacadeFor<$record> for HttpState {
            fn facade(&self) -> &dyn RecordFacade<$record> {
                self.$field.as_ref()
            }
        }
    };
}

facade_for!(Tender => tenders);
facade_for!(Supplier => suppliers);
facade_for!(User => users);
facade_for!(Advertisement => advertisements);
