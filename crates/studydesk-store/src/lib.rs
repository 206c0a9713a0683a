pub mod document;
pub mod memory_store;
pub mod query;
pub mod store;

#[cfg(feature = "sqlite")]
pub(crate) mod sql_query;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use document::*;
pub use memory_store::{CallCounts, MemoryDocumentStore};
pub use query::*;
pub use store::*;

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteDocumentStore;
