//! Integration tests for the `sensors` repository and Postgres store.
//!
//! These need a reachable Postgres (`DATABASE_URL`) and are ignored by
//! default. Run with `cargo test -p thermo-db -- --ignored`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use thermo_core::reading::SensorReading;
use thermo_db::models::sensor::CreateSensorRecord;
use thermo_db::repositories::SensorRepo;
use thermo_db::store::{PgSensorStore, SensorStore, StoreError};

fn record(name: &str, value: i32) -> CreateSensorRecord {
    CreateSensorRecord::from(&SensorReading::new(name, value))
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_and_find_by_name(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let created = SensorRepo::create(&mut conn, &record("Sala", 35))
        .await
        .unwrap();
    assert_eq!(created.name, "Sala");
    assert_eq!(created.value, 35);
    assert!(!created.alarmed);
    assert_eq!(created.unit, "ºC");

    let found = SensorRepo::find_by_name(&mut conn, "Sala")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(found.id, created.id);

    let missing = SensorRepo::find_by_name(&mut conn, "Quarto").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_reading_preserves_name_and_unit(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let created = SensorRepo::create(&mut conn, &record("Sala", 35))
        .await
        .unwrap();

    let rows = SensorRepo::update_reading(&mut conn, "Sala", 39, true)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let updated = SensorRepo::find_by_name(&mut conn, "Sala")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.value, 39);
    assert!(updated.alarmed);
    assert_eq!(updated.unit, created.unit);
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_name_violates_unique_constraint(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    SensorRepo::create(&mut conn, &record("Cozinha", 31))
        .await
        .unwrap();

    let result = SensorRepo::create(&mut conn, &record("Cozinha", 32)).await;
    assert!(result.is_err(), "second insert for the same name must fail");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn pg_store_round_trip(pool: PgPool) {
    let store = PgSensorStore::new(pool);

    assert!(store.find_by_name("Quintal").await.unwrap().is_none());
    assert!(!store.update_reading("Quintal", 30, false).await.unwrap());

    store.insert(&record("Quintal", 40)).await.unwrap();
    assert!(store.set_alarmed("Quintal", false).await.unwrap());

    let found = store.find_by_name("Quintal").await.unwrap().unwrap();
    assert_eq!(found.value, 40);
    assert!(!found.alarmed);

    assert_matches!(
        store.insert(&record("Quintal", 33)).await,
        Err(StoreError::Duplicate { name }) if name == "Quintal"
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn health_check_passes(pool: PgPool) {
    thermo_db::health_check(&pool).await.unwrap();
}
