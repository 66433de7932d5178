pub mod manager;
pub mod memory;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use repository::PgContactStore;
pub use store::ContactStore;
