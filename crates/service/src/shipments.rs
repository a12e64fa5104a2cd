//! Shipment use-case service.

use std::sync::Arc;

use common::{CustomerId, EnterpriseId, ShipmentId};
use domain::{NewShipment, Shipment, ShipmentUpdate};
use store::{CustomerRepository, EnterpriseRepository, ShipmentRepository, StoreError, UnitOfWork};

use crate::error::{ShipmentError, ShipmentResponse};

/// Orchestrates shipment CRUD over the repository and unit-of-work ports.
///
/// Reads delegate straight to the shipment repository and propagate
/// storage failures unchanged. Writes validate first, then stage the
/// repository write and commit through the unit of work; any storage
/// failure past that point is folded into the response envelope rather
/// than surfaced to the caller.
pub struct ShipmentService {
    shipments: Arc<dyn ShipmentRepository>,
    customers: Arc<dyn CustomerRepository>,
    enterprises: Arc<dyn EnterpriseRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl ShipmentService {
    /// Creates a service over the injected storage ports.
    pub fn new(
        shipments: Arc<dyn ShipmentRepository>,
        customers: Arc<dyn CustomerRepository>,
        enterprises: Arc<dyn EnterpriseRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            shipments,
            customers,
            enterprises,
            unit_of_work,
        }
    }

    /// Returns every shipment. Ordering is repository-defined.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Shipment>, StoreError> {
        self.shipments.list().await
    }

    /// Loads a shipment by id.
    ///
    /// Returns None if the shipment doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        self.shipments.find_by_id(id).await
    }

    /// Returns the shipments referencing the given enterprise.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_enterprise_id(
        &self,
        enterprise_id: EnterpriseId,
    ) -> Result<Vec<Shipment>, StoreError> {
        self.shipments.find_by_enterprise_id(enterprise_id).await
    }

    /// Returns the shipments referencing the given customer.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Shipment>, StoreError> {
        self.shipments.find_by_customer_id(customer_id).await
    }

    /// Registers a new shipment.
    ///
    /// The shipment must reference at least one existing customer or
    /// enterprise; a single resolving relation is enough, so a shipment
    /// whose customer is missing but whose enterprise exists is accepted
    /// (and vice versa). Callers relying on both relations must check
    /// them separately.
    #[tracing::instrument(skip(self, shipment))]
    pub async fn save(&self, shipment: NewShipment) -> ShipmentResponse {
        let (customer, enterprise) = tokio::join!(
            self.customers.find_by_id(shipment.customer_id),
            self.enterprises.find_by_id(shipment.enterprise_id),
        );
        let (customer, enterprise) = (customer?, enterprise?);
        if customer.is_none() && enterprise.is_none() {
            return Err(ShipmentError::RelationMissing);
        }

        let write = async {
            let saved = self.shipments.add(shipment).await?;
            self.unit_of_work.complete().await?;
            Ok::<_, StoreError>(saved)
        };
        match write.await {
            Ok(saved) => {
                metrics::counter!("shipments_saved_total").increment(1);
                tracing::info!(shipment_id = %saved.id, "shipment saved");
                Ok(saved)
            }
            Err(e) => Err(ShipmentError::Save(e.to_string())),
        }
    }

    /// Applies an update to an existing shipment.
    ///
    /// Only the delivery date and status are mutable; the customer and
    /// enterprise references are fixed at creation time.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update(&self, id: ShipmentId, changes: ShipmentUpdate) -> ShipmentResponse {
        let Some(mut existing) = self.shipments.find_by_id(id).await? else {
            return Err(ShipmentError::NotFound);
        };
        existing.apply_update(changes);

        let write = async {
            self.shipments.update(&existing).await?;
            self.unit_of_work.complete().await
        };
        match write.await {
            Ok(()) => {
                metrics::counter!("shipments_updated_total").increment(1);
                Ok(existing)
            }
            Err(e) => Err(ShipmentError::Update(e.to_string())),
        }
    }

    /// Removes a shipment, returning its last known state.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ShipmentId) -> ShipmentResponse {
        let Some(existing) = self.shipments.find_by_id(id).await? else {
            return Err(ShipmentError::NotFound);
        };

        let write = async {
            self.shipments.remove(existing.id).await?;
            self.unit_of_work.complete().await
        };
        match write.await {
            Ok(()) => {
                metrics::counter!("shipments_deleted_total").increment(1);
                Ok(existing)
            }
            Err(e) => Err(ShipmentError::Delete(e.to_string())),
        }
    }
}
