//! Shipment entity and its lifecycle types.

use chrono::{DateTime, Utc};
use common::{CustomerId, EnterpriseId, ShipmentId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery status of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShipmentStatus {
    /// Registered but not yet handed to a carrier.
    #[default]
    Pending,

    /// Picked up by the carrier.
    PickedUp,

    /// Moving through the carrier network.
    InTransit,

    /// Delivered to the recipient (terminal state).
    Delivered,

    /// Cancelled before delivery (terminal state).
    Cancelled,
}

impl ShipmentStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::PickedUp => "PickedUp",
            ShipmentStatus::InTransit => "InTransit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Returns true if no further status change is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shipment status: {0}")]
pub struct ParseShipmentStatusError(String);

impl std::str::FromStr for ShipmentStatus {
    type Err = ParseShipmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ShipmentStatus::Pending),
            "PickedUp" => Ok(ShipmentStatus::PickedUp),
            "InTransit" => Ok(ShipmentStatus::InTransit),
            "Delivered" => Ok(ShipmentStatus::Delivered),
            "Cancelled" => Ok(ShipmentStatus::Cancelled),
            other => Err(ParseShipmentStatusError(other.to_string())),
        }
    }
}

/// A trackable delivery record linked to a customer and/or enterprise.
///
/// The customer and enterprise references are plain foreign keys; the
/// referenced row is not guaranteed to exist. The validation rule applied
/// at creation time lives in the shipment service, which requires only
/// one of the two relations to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub customer_id: CustomerId,
    pub enterprise_id: EnterpriseId,
    pub delivery_date: DateTime<Utc>,
    pub status: ShipmentStatus,
}

impl Shipment {
    /// Applies an update, touching only the delivery date and status.
    ///
    /// The customer and enterprise references are fixed at creation time.
    pub fn apply_update(&mut self, update: ShipmentUpdate) {
        self.delivery_date = update.delivery_date;
        self.status = update.status;
    }
}

/// Shipment fields supplied at creation time.
///
/// Identity is assigned by the repository when the shipment is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShipment {
    pub customer_id: CustomerId,
    pub enterprise_id: EnterpriseId,
    pub delivery_date: DateTime<Utc>,
    pub status: ShipmentStatus,
}

impl NewShipment {
    /// Attaches a repository-assigned identity, producing the stored entity.
    pub fn into_shipment(self, id: ShipmentId) -> Shipment {
        Shipment {
            id,
            customer_id: self.customer_id,
            enterprise_id: self.enterprise_id,
            delivery_date: self.delivery_date,
            status: self.status,
        }
    }
}

/// The two shipment fields mutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipmentUpdate {
    pub delivery_date: DateTime<Utc>,
    pub status: ShipmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment() -> Shipment {
        Shipment {
            id: ShipmentId::new(1),
            customer_id: CustomerId::new(10),
            enterprise_id: EnterpriseId::new(20),
            delivery_date: "2024-06-01T12:00:00Z".parse().unwrap(),
            status: ShipmentStatus::Pending,
        }
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(ShipmentStatus::default(), ShipmentStatus::Pending);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ShipmentStatus::Pending.is_terminal());
        assert!(!ShipmentStatus::PickedUp.is_terminal());
        assert!(!ShipmentStatus::InTransit.is_terminal());
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(ShipmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_display_and_parse_roundtrip() {
        for status in [
            ShipmentStatus::Pending,
            ShipmentStatus::PickedUp,
            ShipmentStatus::InTransit,
            ShipmentStatus::Delivered,
            ShipmentStatus::Cancelled,
        ] {
            let parsed: ShipmentStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_fails_to_parse() {
        let err = "Teleported".parse::<ShipmentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown shipment status: Teleported");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ShipmentStatus::InTransit).unwrap();
        assert_eq!(json, "\"InTransit\"");
        let deserialized: ShipmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ShipmentStatus::InTransit);
    }

    #[test]
    fn test_into_shipment_preserves_fields() {
        let new = NewShipment {
            customer_id: CustomerId::new(10),
            enterprise_id: EnterpriseId::new(20),
            delivery_date: "2024-06-01T12:00:00Z".parse().unwrap(),
            status: ShipmentStatus::InTransit,
        };
        let shipment = new.clone().into_shipment(ShipmentId::new(5));

        assert_eq!(shipment.id, ShipmentId::new(5));
        assert_eq!(shipment.customer_id, new.customer_id);
        assert_eq!(shipment.enterprise_id, new.enterprise_id);
        assert_eq!(shipment.delivery_date, new.delivery_date);
        assert_eq!(shipment.status, new.status);
    }

    #[test]
    fn test_apply_update_leaves_relations_unchanged() {
        let mut shipment = shipment();
        shipment.apply_update(ShipmentUpdate {
            delivery_date: "2025-01-01T00:00:00Z".parse().unwrap(),
            status: ShipmentStatus::Delivered,
        });

        let expected: DateTime<Utc> = "2025-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(shipment.delivery_date, expected);
        assert_eq!(shipment.status, ShipmentStatus::Delivered);
        assert_eq!(shipment.customer_id, CustomerId::new(10));
        assert_eq!(shipment.enterprise_id, EnterpriseId::new(20));
        assert_eq!(shipment.id, ShipmentId::new(1));
    }
}
