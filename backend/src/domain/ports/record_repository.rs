//! Driven port for record persistence.
//!
//! The record service reads and writes records through this trait; the
//! in-memory adapter backs it in the server and in tests.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Record, RecordId};

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "record store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } => "record store query failed: {message}",
    }
}

/// Storage of one record family, in insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository<R: Record>: Send + Sync {
    /// Every record, in store order.
    async fn all(&self) -> Result<Vec<R>, RecordRepositoryError>;

    /// Record with `id`, if stored.
    async fn find(&self, id: RecordId) -> Result<Option<R>, RecordRepositoryError>;

    /// Append a new record.
    async fn insert(&self, record: R) -> Result<(), RecordRepositoryError>;

    /// Replace the stored record with the same id; `false` when absent.
    async fn replace(&self, record: R) -> Result<bool, RecordRepositoryError>;

    /// Remove the record with `id`; `false` when absent.
    async fn remove(&self, id: RecordId) -> Result<bool, RecordRepositoryError>;
}
