//! PostgreSQL integration tests
//!
//! These tests share one PostgreSQL container for efficiency; `#[serial]`
//! keeps them from racing on the shared tables.

use std::sync::Arc;

use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use common::{CustomerId, EnterpriseId};
use domain::{NewCustomer, NewEnterprise, NewShipment, ShipmentStatus};
use store::{
    CustomerRepository, EnterpriseRepository, PgStore, ShipmentRepository, UnitOfWork,
};

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for the schema
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run the schema using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_shipment_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PgStore {
    let info = get_container_info().await;

    // Create a fresh pool for each test to avoid connection issues
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE shipments, customers, enterprises RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PgStore::new(pool)
}

fn new_shipment(customer: i64, enterprise: i64) -> NewShipment {
    NewShipment {
        customer_id: CustomerId::new(customer),
        enterprise_id: EnterpriseId::new(enterprise),
        delivery_date: "2024-06-01T12:00:00Z".parse().unwrap(),
        status: ShipmentStatus::Pending,
    }
}

#[tokio::test]
#[serial]
async fn add_and_complete_round_trips() {
    let store = get_test_store().await;

    let added = ShipmentRepository::add(&store, new_shipment(1, 2)).await.unwrap();
    store.complete().await.unwrap();

    let found = ShipmentRepository::find_by_id(&store, added.id)
        .await
        .unwrap()
        .expect("shipment should be stored");
    assert_eq!(found, added);
}

#[tokio::test]
#[serial]
async fn staged_writes_invisible_before_complete() {
    let store = get_test_store().await;

    let added = ShipmentRepository::add(&store, new_shipment(1, 2)).await.unwrap();
    assert!(
        ShipmentRepository::find_by_id(&store, added.id)
            .await
            .unwrap()
            .is_none()
    );

    store.complete().await.unwrap();
    assert!(
        ShipmentRepository::find_by_id(&store, added.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
#[serial]
async fn update_persists_mutated_fields_only() {
    let store = get_test_store().await;

    let mut shipment = ShipmentRepository::add(&store, new_shipment(1, 2)).await.unwrap();
    store.complete().await.unwrap();

    shipment.delivery_date = "2025-01-01T00:00:00Z".parse().unwrap();
    shipment.status = ShipmentStatus::Delivered;
    ShipmentRepository::update(&store, &shipment).await.unwrap();
    store.complete().await.unwrap();

    let found = ShipmentRepository::find_by_id(&store, shipment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, ShipmentStatus::Delivered);
    let expected: chrono::DateTime<chrono::Utc> = "2025-01-01T00:00:00Z".parse().unwrap();
    assert_eq!(found.delivery_date, expected);
    assert_eq!(found.customer_id, CustomerId::new(1));
    assert_eq!(found.enterprise_id, EnterpriseId::new(2));
}

#[tokio::test]
#[serial]
async fn remove_deletes_the_row() {
    let store = get_test_store().await;

    let shipment = ShipmentRepository::add(&store, new_shipment(1, 2)).await.unwrap();
    store.complete().await.unwrap();

    ShipmentRepository::remove(&store, shipment.id).await.unwrap();
    store.complete().await.unwrap();

    assert!(
        ShipmentRepository::find_by_id(&store, shipment.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(ShipmentRepository::list(&store).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn relation_filters_match_foreign_keys() {
    let store = get_test_store().await;

    ShipmentRepository::add(&store, new_shipment(1, 9)).await.unwrap();
    ShipmentRepository::add(&store, new_shipment(1, 8)).await.unwrap();
    ShipmentRepository::add(&store, new_shipment(2, 9)).await.unwrap();
    store.complete().await.unwrap();

    let for_customer = store.find_by_customer_id(CustomerId::new(1)).await.unwrap();
    assert_eq!(for_customer.len(), 2);

    let for_enterprise = store
        .find_by_enterprise_id(EnterpriseId::new(9))
        .await
        .unwrap();
    assert_eq!(for_enterprise.len(), 2);

    let none = store.find_by_customer_id(CustomerId::new(404)).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[serial]
async fn one_commit_applies_several_staged_writes() {
    let store = get_test_store().await;

    let customer = CustomerRepository::add(
        &store,
        NewCustomer {
            name: "Acme Logistics".to_string(),
            email: "ops@acme.test".to_string(),
        },
    )
    .await
    .unwrap();
    let enterprise = EnterpriseRepository::add(
        &store,
        NewEnterprise {
            name: "Northwind Freight".to_string(),
            email: "dispatch@northwind.test".to_string(),
        },
    )
    .await
    .unwrap();
    let shipment = ShipmentRepository::add(
        &store,
        new_shipment(customer.id.as_i64(), enterprise.id.as_i64()),
    )
    .await
    .unwrap();

    store.complete().await.unwrap();

    assert_eq!(
        CustomerRepository::find_by_id(&store, customer.id).await.unwrap(),
        Some(customer)
    );
    assert_eq!(
        EnterpriseRepository::find_by_id(&store, enterprise.id)
            .await
            .unwrap(),
        Some(enterprise)
    );
    assert_eq!(
        ShipmentRepository::find_by_id(&store, shipment.id).await.unwrap(),
        Some(shipment)
    );
}

#[tokio::test]
#[serial]
async fn ids_come_from_the_table_sequences() {
    let store = get_test_store().await;

    let first = ShipmentRepository::add(&store, new_shipment(1, 1)).await.unwrap();
    let second = ShipmentRepository::add(&store, new_shipment(1, 1)).await.unwrap();

    assert!(second.id.as_i64() > first.id.as_i64());
}
