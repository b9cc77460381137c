//! HTTP inbound adapter exposing the record facade and account endpoints.

pub mod advertisements;
pub mod auth;
pub mod error;
pub mod query;
pub mod records;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
