//! Persistence layer. Key-value storage and the preference store on top of it.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod preferences;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use preferences::PreferenceStore;
pub use traits::KeyValueStore;
