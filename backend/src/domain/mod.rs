//! Domain primitives, records and services.
//!
//! Purpose: hold the marketplace rules independently of any transport. Form
//! validation, filtering and record lifecycles live here; adapters reach them
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): facade error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Tender, Supplier, User, Advertisement: the four record families.
//! - RecordService: facade implementation over a record repository.
//! - AppContext: client session and theme state.

pub mod ad_rotation;
pub mod advertisement;
pub mod app_context;
pub mod auth;
pub mod error;
pub mod filter;
pub mod form;
pub mod ports;
pub mod record;
pub mod record_service;
pub mod supplier;
pub mod tender;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::ad_rotation::{AdRotationService, DefaultPlacement, Placement};
pub use self::advertisement::{AdPosition, AdType, Advertisement, AdvertisementInput};
pub use self::app_context::{AppContext, Theme};
pub use self::auth::{
    AuthSession, LoginCredentials, LoginValidationError, Registration, SessionToken,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{FilterCriteria, Filterable, SortOrder};
pub use self::record::{Record, RecordId, RecordKind};
pub use self::record_service::RecordService;
pub use self::supplier::{Supplier, SupplierInput, VerificationStatus};
pub use self::tender::{Tender, TenderInput, TenderStatus, TenderType};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserInput, UserRole, UserStatus};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ci_tender::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
