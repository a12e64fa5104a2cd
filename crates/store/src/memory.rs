//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, EnterpriseId, ShipmentId};
use domain::{Customer, Enterprise, NewCustomer, NewEnterprise, NewShipment, Shipment};
use tokio::sync::RwLock;

use crate::pending::PendingWrite;
use crate::repository::{CustomerRepository, EnterpriseRepository, ShipmentRepository, UnitOfWork};
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    shipments: HashMap<i64, Shipment>,
    customers: HashMap<i64, Customer>,
    enterprises: HashMap<i64, Enterprise>,
    pending: Vec<PendingWrite>,
    last_id: i64,
    fail_on_complete: bool,
}

impl MemoryState {
    // One counter for all entity types keeps ids unique across tables,
    // which makes misrouted ids fail loudly in tests.
    fn allocate_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory storage backend for testing and single-process deployments.
///
/// Implements every repository port plus the unit of work over one shared
/// state, with the same staged-write semantics as the PostgreSQL backend:
/// writes are buffered at the repository and become visible to reads only
/// once `complete` applies them under a single write lock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms or disarms commit failure injection.
    ///
    /// While armed, `complete` fails with [`StoreError::Unavailable`] and
    /// discards whatever writes were staged.
    pub async fn set_fail_on_complete(&self, fail: bool) {
        self.state.write().await.fail_on_complete = fail;
    }

    /// Returns the number of committed shipments.
    pub async fn shipment_count(&self) -> usize {
        self.state.read().await.shipments.len()
    }

    /// Returns the number of staged, uncommitted writes.
    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }
}

#[async_trait]
impl ShipmentRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Shipment>> {
        let state = self.state.read().await;
        let mut shipments: Vec<_> = state.shipments.values().cloned().collect();
        shipments.sort_by_key(|s| s.id);
        Ok(shipments)
    }

    async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>> {
        let state = self.state.read().await;
        Ok(state.shipments.get(&id.as_i64()).cloned())
    }

    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Shipment>> {
        let state = self.state.read().await;
        let mut shipments: Vec<_> = state
            .shipments
            .values()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect();
        shipments.sort_by_key(|s| s.id);
        Ok(shipments)
    }

    async fn find_by_enterprise_id(&self, enterprise_id: EnterpriseId) -> Result<Vec<Shipment>> {
        let state = self.state.read().await;
        let mut shipments: Vec<_> = state
            .shipments
            .values()
            .filter(|s| s.enterprise_id == enterprise_id)
            .cloned()
            .collect();
        shipments.sort_by_key(|s| s.id);
        Ok(shipments)
    }

    async fn add(&self, shipment: NewShipment) -> Result<Shipment> {
        let mut state = self.state.write().await;
        let id = ShipmentId::new(state.allocate_id());
        let shipment = shipment.into_shipment(id);
        state.pending.push(PendingWrite::InsertShipment(shipment.clone()));
        Ok(shipment)
    }

    async fn update(&self, shipment: &Shipment) -> Result<()> {
        let mut state = self.state.write().await;
        state.pending.push(PendingWrite::UpdateShipment(shipment.clone()));
        Ok(())
    }

    async fn remove(&self, id: ShipmentId) -> Result<()> {
        let mut state = self.state.write().await;
        state.pending.push(PendingWrite::DeleteShipment(id));
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Customer>> {
        let state = self.state.read().await;
        let mut customers: Vec<_> = state.customers.values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state.customers.get(&id.as_i64()).cloned())
    }

    async fn add(&self, customer: NewCustomer) -> Result<Customer> {
        let mut state = self.state.write().await;
        let id = CustomerId::new(state.allocate_id());
        let customer = customer.into_customer(id);
        state.pending.push(PendingWrite::InsertCustomer(customer.clone()));
        Ok(customer)
    }
}

#[async_trait]
impl EnterpriseRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Enterprise>> {
        let state = self.state.read().await;
        let mut enterprises: Vec<_> = state.enterprises.values().cloned().collect();
        enterprises.sort_by_key(|e| e.id);
        Ok(enterprises)
    }

    async fn find_by_id(&self, id: EnterpriseId) -> Result<Option<Enterprise>> {
        let state = self.state.read().await;
        Ok(state.enterprises.get(&id.as_i64()).cloned())
    }

    async fn add(&self, enterprise: NewEnterprise) -> Result<Enterprise> {
        let mut state = self.state.write().await;
        let id = EnterpriseId::new(state.allocate_id());
        let enterprise = enterprise.into_enterprise(id);
        state.pending.push(PendingWrite::InsertEnterprise(enterprise.clone()));
        Ok(enterprise)
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn complete(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let pending = std::mem::take(&mut state.pending);
        if state.fail_on_complete {
            return Err(StoreError::Unavailable("commit rejected".to_string()));
        }

        for write in pending {
            match write {
                // The row was fetched just before the update was staged,
                // so applying it as an upsert is safe.
                PendingWrite::InsertShipment(s) | PendingWrite::UpdateShipment(s) => {
                    state.shipments.insert(s.id.as_i64(), s);
                }
                PendingWrite::DeleteShipment(id) => {
                    state.shipments.remove(&id.as_i64());
                }
                PendingWrite::InsertCustomer(c) => {
                    state.customers.insert(c.id.as_i64(), c);
                }
                PendingWrite::InsertEnterprise(e) => {
                    state.enterprises.insert(e.id.as_i64(), e);
                }
            }
        }
        Ok(())
    }
}
