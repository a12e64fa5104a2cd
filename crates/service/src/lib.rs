//! Use-case services for the shipment tracking system.

pub mod error;
pub mod shipments;

pub use error::{ShipmentError, ShipmentResponse};
pub use shipments::ShipmentService;
