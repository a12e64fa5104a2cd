//! PostgreSQL storage backend.

use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, EnterpriseId, ShipmentId};
use domain::{Customer, Enterprise, NewCustomer, NewEnterprise, NewShipment, Shipment};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tokio::sync::Mutex;

use crate::pending::PendingWrite;
use crate::repository::{CustomerRepository, EnterpriseRepository, ShipmentRepository, UnitOfWork};
use crate::{Result, StoreError};

/// PostgreSQL-backed storage.
///
/// Reads go straight to the connection pool; writes are staged and
/// flushed in a single transaction when the unit of work completes.
/// Identities come from the table sequences at `add` time - sequences
/// are non-transactional, so a discarded commit may burn ids.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    pending: Arc<Mutex<Vec<PendingWrite>>>,
}

impl PgStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connects to the given database URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn next_id(&self, table: &str) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("SELECT nextval(pg_get_serial_sequence($1, 'id'))")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    fn row_to_shipment(row: PgRow) -> Result<Shipment> {
        let status: String = row.try_get("status")?;
        Ok(Shipment {
            id: ShipmentId::new(row.try_get("id")?),
            customer_id: CustomerId::new(row.try_get("customer_id")?),
            enterprise_id: EnterpriseId::new(row.try_get("enterprise_id")?),
            delivery_date: row.try_get("delivery_date")?,
            status: status
                .parse()
                .map_err(|e: domain::shipment::ParseShipmentStatusError| {
                    StoreError::Decode(e.to_string())
                })?,
        })
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        Ok(Customer {
            id: CustomerId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
        })
    }

    fn row_to_enterprise(row: PgRow) -> Result<Enterprise> {
        Ok(Enterprise {
            id: EnterpriseId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
        })
    }

    async fn apply(tx: &mut Transaction<'static, Postgres>, write: &PendingWrite) -> Result<()> {
        match write {
            PendingWrite::InsertShipment(s) => {
                sqlx::query(
                    r#"
                    INSERT INTO shipments (id, customer_id, enterprise_id, delivery_date, status)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(s.id.as_i64())
                .bind(s.customer_id.as_i64())
                .bind(s.enterprise_id.as_i64())
                .bind(s.delivery_date)
                .bind(s.status.as_str())
                .execute(&mut **tx)
                .await?;
            }
            PendingWrite::UpdateShipment(s) => {
                sqlx::query("UPDATE shipments SET delivery_date = $2, status = $3 WHERE id = $1")
                    .bind(s.id.as_i64())
                    .bind(s.delivery_date)
                    .bind(s.status.as_str())
                    .execute(&mut **tx)
                    .await?;
            }
            PendingWrite::DeleteShipment(id) => {
                sqlx::query("DELETE FROM shipments WHERE id = $1")
                    .bind(id.as_i64())
                    .execute(&mut **tx)
                    .await?;
            }
            PendingWrite::InsertCustomer(c) => {
                sqlx::query("INSERT INTO customers (id, name, email) VALUES ($1, $2, $3)")
                    .bind(c.id.as_i64())
                    .bind(&c.name)
                    .bind(&c.email)
                    .execute(&mut **tx)
                    .await?;
            }
            PendingWrite::InsertEnterprise(e) => {
                sqlx::query("INSERT INTO enterprises (id, name, email) VALUES ($1, $2, $3)")
                    .bind(e.id.as_i64())
                    .bind(&e.name)
                    .bind(&e.email)
                    .execute(&mut **tx)
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ShipmentRepository for PgStore {
    async fn list(&self) -> Result<Vec<Shipment>> {
        let rows = sqlx::query(
            "SELECT id, customer_id, enterprise_id, delivery_date, status FROM shipments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_shipment).collect()
    }

    async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>> {
        let row = sqlx::query(
            "SELECT id, customer_id, enterprise_id, delivery_date, status FROM shipments WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_shipment).transpose()
    }

    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Shipment>> {
        let rows = sqlx::query(
            "SELECT id, customer_id, enterprise_id, delivery_date, status FROM shipments \
             WHERE customer_id = $1 ORDER BY id",
        )
        .bind(customer_id.as_i64())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_shipment).collect()
    }

    async fn find_by_enterprise_id(&self, enterprise_id: EnterpriseId) -> Result<Vec<Shipment>> {
        let rows = sqlx::query(
            "SELECT id, customer_id, enterprise_id, delivery_date, status FROM shipments \
             WHERE enterprise_id = $1 ORDER BY id",
        )
        .bind(enterprise_id.as_i64())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_shipment).collect()
    }

    async fn add(&self, shipment: NewShipment) -> Result<Shipment> {
        let id = self.next_id("shipments").await?;
        let shipment = shipment.into_shipment(ShipmentId::new(id));
        self.pending
            .lock()
            .await
            .push(PendingWrite::InsertShipment(shipment.clone()));
        Ok(shipment)
    }

    async fn update(&self, shipment: &Shipment) -> Result<()> {
        self.pending
            .lock()
            .await
            .push(PendingWrite::UpdateShipment(shipment.clone()));
        Ok(())
    }

    async fn remove(&self, id: ShipmentId) -> Result<()> {
        self.pending
            .lock()
            .await
            .push(PendingWrite::DeleteShipment(id));
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for PgStore {
    async fn list(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query("SELECT id, name, email FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_customer).collect()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query("SELECT id, name, email FROM customers WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_customer).transpose()
    }

    async fn add(&self, customer: NewCustomer) -> Result<Customer> {
        let id = self.next_id("customers").await?;
        let customer = customer.into_customer(CustomerId::new(id));
        self.pending
            .lock()
            .await
            .push(PendingWrite::InsertCustomer(customer.clone()));
        Ok(customer)
    }
}

#[async_trait]
impl EnterpriseRepository for PgStore {
    async fn list(&self) -> Result<Vec<Enterprise>> {
        let rows = sqlx::query("SELECT id, name, email FROM enterprises ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_enterprise).collect()
    }

    async fn find_by_id(&self, id: EnterpriseId) -> Result<Option<Enterprise>> {
        let row = sqlx::query("SELECT id, name, email FROM enterprises WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_enterprise).transpose()
    }

    async fn add(&self, enterprise: NewEnterprise) -> Result<Enterprise> {
        let id = self.next_id("enterprises").await?;
        let enterprise = enterprise.into_enterprise(EnterpriseId::new(id));
        self.pending
            .lock()
            .await
            .push(PendingWrite::InsertEnterprise(enterprise.clone()));
        Ok(enterprise)
    }
}

#[async_trait]
impl UnitOfWork for PgStore {
    async fn complete(&self) -> Result<()> {
        // Taking the set before the transaction begins means a failed
        // commit discards it, matching the in-memory backend.
        let pending = std::mem::take(&mut *self.pending.lock().await);
        if pending.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for write in &pending {
            Self::apply(&mut tx, write).await?;
        }
        tx.commit().await?;

        tracing::debug!(writes = pending.len(), "write set committed");
        Ok(())
    }
}
