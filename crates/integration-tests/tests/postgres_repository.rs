//! Generic repository against a real `PostgreSQL` database.
//!
//! These tests require a disposable database:
//!
//! ```bash
//! ECOSAVE_TEST_DATABASE_URL=postgres://localhost/ecosave_test \
//!     cargo test -p ecosave-integration-tests -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use ecosave_api::db::{self, Database, FetchPlan, Repository, RepositoryError, UserRepository};
use ecosave_api::models::{ConsumptionRecord, Device, Room, User};
use ecosave_core::{DeviceId, RoomId, UserId};
use rust_decimal::Decimal;
use secrecy::SecretString;

async fn database() -> Database {
    let url = std::env::var("ECOSAVE_TEST_DATABASE_URL")
        .expect("ECOSAVE_TEST_DATABASE_URL must be set for ignored tests");
    let pool = db::create_pool(&SecretString::from(url)).await.unwrap();
    sqlx::migrate!("../api/migrations").run(&pool).await.unwrap();
    Database::Postgres(pool)
}

fn user(name: &str) -> User {
    User {
        id: UserId::default(),
        name: name.to_string(),
        tax_id: "123.456.789-00".to_string(),
        email: format!("{}@ecosave.test", name.to_lowercase()),
        phone: "11 99999-0000".to_string(),
    }
}

#[tokio::test]
#[ignore = "Requires ECOSAVE_TEST_DATABASE_URL"]
async fn test_crud_cycle() {
    let db = database().await;
    let repo = Repository::<User>::new(&db);

    let created = repo.add(user("Fabi")).await.unwrap();
    assert_eq!(repo.get(created.id).await.unwrap().as_ref(), Some(&created));

    let mut changed = created.clone();
    changed.phone = "21 90000-1111".to_string();
    repo.update(changed.clone()).await.unwrap();
    assert_eq!(repo.get(created.id).await.unwrap(), Some(changed));

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get(created.id).await.unwrap().is_none());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(matches!(
        repo.update(created).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "Requires ECOSAVE_TEST_DATABASE_URL"]
async fn test_foreign_key_violation_is_reported() {
    let db = database().await;
    let owner = Repository::<User>::new(&db).add(user("Gil")).await.unwrap();

    let result = Repository::<Device>::new(&db)
        .add(Device {
            id: DeviceId::default(),
            user_id: owner.id,
            room_id: RoomId::new(i32::MAX),
            name: "TV".to_string(),
            model: "LED".to_string(),
        })
        .await;

    assert!(matches!(result, Err(RepositoryError::ForeignKey(_))));
    Repository::<User>::new(&db).delete(owner.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires ECOSAVE_TEST_DATABASE_URL"]
async fn test_spend_plan_and_cascade() {
    let db = database().await;
    let owner = Repository::<User>::new(&db).add(user("Hugo")).await.unwrap();
    let room = Repository::<Room>::new(&db)
        .add(Room {
            id: RoomId::default(),
            name: "Garagem".to_string(),
        })
        .await
        .unwrap();
    let device = Repository::<Device>::new(&db)
        .add(Device {
            id: DeviceId::default(),
            user_id: owner.id,
            room_id: room.id,
            name: "Carregador".to_string(),
            model: "EV-7".to_string(),
        })
        .await
        .unwrap();
    let reading = Repository::<ConsumptionRecord>::new(&db)
        .add(ConsumptionRecord::new(
            device.id,
            Decimal::new(4200, 1),
            Decimal::new(231_075, 2),
        ))
        .await
        .unwrap();

    let detail = UserRepository::new(&db)
        .get(owner.id, FetchPlan::SPEND)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.average_spend, Some(Decimal::new(231_075, 2)));

    Repository::<User>::new(&db).delete(owner.id).await.unwrap();
    assert!(
        Repository::<ConsumptionRecord>::new(&db)
            .get(reading.id)
            .await
            .unwrap()
            .is_none()
    );
    Repository::<Room>::new(&db).delete(room.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires ECOSAVE_TEST_DATABASE_URL"]
async fn test_value_rejected_by_column_is_invalid_data() {
    let db = database().await;
    let owner = Repository::<User>::new(&db).add(user("Iris")).await.unwrap();
    let room = Repository::<Room>::new(&db)
        .add(Room {
            id: RoomId::default(),
            name: "Escritório".to_string(),
        })
        .await
        .unwrap();
    let device = Repository::<Device>::new(&db)
        .add(Device {
            id: DeviceId::default(),
            user_id: owner.id,
            room_id: room.id,
            name: "Monitor".to_string(),
            model: "M-27".to_string(),
        })
        .await
        .unwrap();

    // NUMERIC(12, 2) holds at most ten integer digits.
    let result = Repository::<ConsumptionRecord>::new(&db)
        .add(ConsumptionRecord::new(
            device.id,
            Decimal::ONE,
            Decimal::new(100_000_000_000, 0),
        ))
        .await;
    assert!(matches!(result, Err(RepositoryError::InvalidData(_))));

    let result = Repository::<Room>::new(&db)
        .add(Room {
            id: RoomId::default(),
            name: "Sala\0".to_string(),
        })
        .await;
    assert!(matches!(result, Err(RepositoryError::InvalidData(_))));

    Repository::<User>::new(&db).delete(owner.id).await.unwrap();
    Repository::<Room>::new(&db).delete(room.id).await.unwrap();
}
