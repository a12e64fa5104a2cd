pub mod error;
pub mod memory;
mod pending;
pub mod postgres;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{CustomerRepository, EnterpriseRepository, ShipmentRepository, UnitOfWork};
