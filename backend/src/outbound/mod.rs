//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process record store and account service
//! - **session_store**: in-memory and directory-backed session persistence
//!
//! Adapters are thin translators between domain types and their backing
//! medium. They contain no business logic.

pub mod memory;
pub mod session_store;
