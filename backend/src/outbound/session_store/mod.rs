//! [`SessionStore`](crate::domain::ports::SessionStore) adapters.

mod dir;
mod memory;

pub use dir::DirSessionStore;
pub use memory::MemorySessionStore;
