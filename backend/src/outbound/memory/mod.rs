//! In-process adapters for the record and account ports.

mod accounts;
mod record_store;

pub use accounts::InMemoryAccounts;
pub use record_store::InMemoryRecordStore;
