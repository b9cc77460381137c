//! Tender and supplier marketplace core.
//!
//! - [`domain`]: validation rules, form state, filtering, records and the
//!   facade services.
//! - [`inbound`]: the actix-web adapter.
//! - [`outbound`]: in-memory stores, accounts and session persistence.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
pub mod test_support;

pub use middleware::Trace;
