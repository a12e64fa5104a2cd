//! Repository and unit-of-work ports.
//!
//! One trait per storage capability. Implementations must be thread-safe
//! (Send + Sync) so they can be shared behind `Arc<dyn _>` collaborators.

use async_trait::async_trait;
use common::{CustomerId, EnterpriseId, ShipmentId};
use domain::{Customer, Enterprise, NewCustomer, NewEnterprise, NewShipment, Shipment};

use crate::Result;

/// Storage port for shipments.
///
/// Writes (`add`, `update`, `remove`) are staged until the unit of work
/// commits them; reads observe committed state only. Listing order is
/// repository-defined, so callers must not rely on it.
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Returns every stored shipment.
    async fn list(&self) -> Result<Vec<Shipment>>;

    /// Looks up a shipment by id.
    ///
    /// Returns None if no shipment with the given id exists.
    async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>>;

    /// Returns the shipments referencing the given customer.
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Shipment>>;

    /// Returns the shipments referencing the given enterprise.
    async fn find_by_enterprise_id(&self, enterprise_id: EnterpriseId) -> Result<Vec<Shipment>>;

    /// Assigns an identity and stages the shipment for insertion.
    ///
    /// The returned entity carries the assigned id but is not visible to
    /// reads until the unit of work completes.
    async fn add(&self, shipment: NewShipment) -> Result<Shipment>;

    /// Stages an update of the given shipment.
    async fn update(&self, shipment: &Shipment) -> Result<()>;

    /// Stages removal of the shipment with the given id.
    async fn remove(&self, id: ShipmentId) -> Result<()>;
}

/// Storage port for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Returns every stored customer.
    async fn list(&self) -> Result<Vec<Customer>>;

    /// Looks up a customer by id.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Assigns an identity and stages the customer for insertion.
    async fn add(&self, customer: NewCustomer) -> Result<Customer>;
}

/// Storage port for enterprises.
#[async_trait]
pub trait EnterpriseRepository: Send + Sync {
    /// Returns every stored enterprise.
    async fn list(&self) -> Result<Vec<Enterprise>>;

    /// Looks up an enterprise by id.
    async fn find_by_id(&self, id: EnterpriseId) -> Result<Option<Enterprise>>;

    /// Assigns an identity and stages the enterprise for insertion.
    async fn add(&self, enterprise: NewEnterprise) -> Result<Enterprise>;
}

/// Transactional commit boundary spanning the staged repository writes.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commits all staged writes atomically.
    ///
    /// On failure the staged set is discarded: either every staged write
    /// lands or none of them do.
    async fn complete(&self) -> Result<()>;
}
