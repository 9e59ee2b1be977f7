//! Seed the database with a small demo household.
//!
//! Goes through the same repository the API uses, so foreign keys and
//! returned ids behave exactly as they do over HTTP.

use ecosave_api::db::{self, Database, Repository};
use ecosave_api::models::{Address, ConsumptionRecord, Device, LoyaltyPoint, Room, User};
use ecosave_core::{AddressId, DeviceId, LoyaltyPointId, RoomId, UserId};
use rust_decimal::Decimal;
use tracing::info;

use super::{CommandError, database_url};

/// Insert one user with an address, two devices in one room, one reading
/// per device splitting `total_cost`, and a loyalty point entry.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn demo(total_cost: u32) -> Result<(), CommandError> {
    let pool = db::create_pool(&database_url()?).await?;
    let db = Database::Postgres(pool);

    let user = Repository::<User>::new(&db)
        .add(User {
            id: UserId::default(),
            name: "Maria Demo".to_string(),
            tax_id: "000.000.000-00".to_string(),
            email: "maria.demo@ecosave.local".to_string(),
            phone: "11 90000-0000".to_string(),
        })
        .await?;
    info!(user_id = %user.id, "Created demo user");

    Repository::<Address>::new(&db)
        .add(Address {
            id: AddressId::default(),
            user_id: user.id,
            postal_code: "01001-000".to_string(),
            number: 100,
            complement: "Casa".to_string(),
        })
        .await?;

    let room = Repository::<Room>::new(&db)
        .add(Room {
            id: RoomId::default(),
            name: "Cozinha".to_string(),
        })
        .await?;

    let half = Decimal::from(total_cost) / Decimal::TWO;
    for (name, model) in [("Geladeira", "Frost Free 400L"), ("Micro-ondas", "MO-30")] {
        let device = Repository::<Device>::new(&db)
            .add(Device {
                id: DeviceId::default(),
                user_id: user.id,
                room_id: room.id,
                name: name.to_string(),
                model: model.to_string(),
            })
            .await?;
        Repository::<ConsumptionRecord>::new(&db)
            .add(ConsumptionRecord::new(device.id, Decimal::new(3000, 1), half))
            .await?;
        info!(device_id = %device.id, %name, "Created demo device");
    }

    Repository::<LoyaltyPoint>::new(&db)
        .add(LoyaltyPoint {
            id: LoyaltyPointId::default(),
            user_id: user.id,
            points: Decimal::new(100, 0),
            description: "Bônus de cadastro".to_string(),
        })
        .await?;

    info!(user_id = %user.id, %total_cost, "Seed complete");
    Ok(())
}
