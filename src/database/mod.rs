pub mod manager;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use repository::{Document, Repository};
pub use store::{DocumentStore, FindOptions, StoreError, UniqueKey, UNIQUE_KEYS};
