pub mod types;

pub use types::{CustomerId, EnterpriseId, ShipmentId};
