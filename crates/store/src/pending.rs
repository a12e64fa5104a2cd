//! Staged writes shared by the storage backends.

use common::ShipmentId;
use domain::{Customer, Enterprise, Shipment};

/// A single staged write, applied when the unit of work completes.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    InsertShipment(Shipment),
    UpdateShipment(Shipment),
    DeleteShipment(ShipmentId),
    InsertCustomer(Customer),
    InsertEnterprise(Enterprise),
}
