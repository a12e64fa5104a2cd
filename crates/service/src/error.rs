//! Service error types and the response envelope.

use domain::Shipment;
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by shipment write operations.
///
/// The Display output of each variant is the user-visible message carried
/// in the response envelope, so the wording is part of the API contract.
#[derive(Debug, Error)]
pub enum ShipmentError {
    /// No shipment with the requested id exists (update/delete paths).
    #[error("Shipment not found")]
    NotFound,

    /// Neither the referenced customer nor the referenced enterprise
    /// exists (save path only).
    #[error("Customer or Enterprise not found.")]
    RelationMissing,

    /// The storage backend failed while persisting a new shipment.
    #[error("An error occurred while saving the shipment: {0}")]
    Save(String),

    /// The storage backend failed while persisting an update.
    #[error("An error occurred while updating the shipment: {0}")]
    Update(String),

    /// The storage backend failed while removing a shipment.
    #[error("An error occurred while deleting the shipment: {0}")]
    Delete(String),

    /// A lookup failed before any write was staged. Read failures pass
    /// through unchanged instead of being folded into an operation
    /// message.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result envelope returned by shipment write operations: the affected
/// entity on success, a message-bearing error otherwise. Never both.
pub type ShipmentResponse = std::result::Result<Shipment, ShipmentError>;
