//! Persistence layer — the profile store and the collaborators it talks to.

pub mod libsql_cache;
pub mod memory;
pub mod profile_store;
pub mod traits;

pub use libsql_cache::LibSqlCache;
pub use memory::{MemoryCache, MemoryRemote, SessionAuth};
pub use profile_store::ProfileStore;
pub use traits::{AuthProvider, LocalCache, RemoteProfiles, SessionEvent};
