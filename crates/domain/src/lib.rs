//! Domain entities for the shipment tracking system.

pub mod customer;
pub mod enterprise;
pub mod shipment;

pub use customer::{Customer, NewCustomer};
pub use enterprise::{Enterprise, NewEnterprise};
pub use shipment::{NewShipment, Shipment, ShipmentStatus, ShipmentUpdate};
