//! Spend evaluation: compare a user's total consumption cost with the
//! national average and, when it is above, fetch a saving tip.

use std::future::Future;

use ecosave_core::{NATIONAL_AVERAGE_SPEND, SpendLevel, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{Database, RepositoryError, UserRepository};

pub const HIGH_SPEND_MESSAGE: &str = "Seu consumo está acima da média.";
pub const NORMAL_SPEND_MESSAGE: &str = "Seu consumo está dentro da média.";
pub const NORMAL_SPEND_TIP: &str = "Continue monitorando seu consumo para manter-se eficiente.";

/// Where energy-saving tips come from.
///
/// Implementations never fail: any upstream problem is turned into a
/// user-facing fallback sentence.
pub trait TipSource: Send + Sync {
    fn energy_tip(&self) -> impl Future<Output = String> + Send;
}

/// Verdict returned by `GET /ecosave/usuarios/{id}/calcular-media-avaliacao`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendEvaluation {
    #[serde(rename = "avaliacao")]
    pub level: SpendLevel,
    #[serde(rename = "mensagem")]
    pub message: String,
    #[serde(rename = "dica")]
    pub tip: String,
}

/// Classify a total and attach the matching message and tip.
///
/// The tip source is only consulted for high spend.
pub async fn assess<T: TipSource>(total: Decimal, tips: &T) -> SpendEvaluation {
    match SpendLevel::classify(total) {
        SpendLevel::Alto => SpendEvaluation {
            level: SpendLevel::Alto,
            message: HIGH_SPEND_MESSAGE.to_string(),
            tip: tips.energy_tip().await,
        },
        SpendLevel::Normal => SpendEvaluation {
            level: SpendLevel::Normal,
            message: NORMAL_SPEND_MESSAGE.to_string(),
            tip: NORMAL_SPEND_TIP.to_string(),
        },
    }
}

/// Evaluate the spend of one user. `None` when the user does not exist.
///
/// # Errors
///
/// Returns an error if loading the user's devices and consumption fails.
pub async fn evaluate_spend<T: TipSource>(
    db: &Database,
    tips: &T,
    user_id: UserId,
) -> Result<Option<SpendEvaluation>, RepositoryError> {
    let Some(total) = UserRepository::new(db).total_spend(user_id).await? else {
        return Ok(None);
    };

    let evaluation = assess(total, tips).await;
    tracing::info!(
        %user_id,
        %total,
        threshold = %NATIONAL_AVERAGE_SPEND,
        level = %evaluation.level,
        "evaluated user spend"
    );
    Ok(Some(evaluation))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ecosave_core::{DeviceId, RoomId};

    use super::*;
    use crate::db::{MemoryStore, Repository};
    use crate::models::{ConsumptionRecord, Device, Room, User};

    const MOCK_TIP: &str = "Reduza o uso de energia.";

    #[derive(Default)]
    struct StaticTip {
        calls: AtomicUsize,
    }

    impl TipSource for StaticTip {
        fn energy_tip(&self) -> impl Future<Output = String> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async { MOCK_TIP.to_string() }
        }
    }

    async fn user_with_costs(costs: &[i64]) -> (Database, UserId) {
        let db = Database::Memory(MemoryStore::new());
        let user = Repository::<User>::new(&db)
            .add(User {
                id: UserId::default(),
                name: "Diego".to_string(),
                tax_id: "111.222.333-44".to_string(),
                email: "diego@ecosave.test".to_string(),
                phone: "41 95555-3333".to_string(),
            })
            .await
            .unwrap();
        let room = Repository::<Room>::new(&db)
            .add(Room {
                id: RoomId::default(),
                name: "Quarto".to_string(),
            })
            .await
            .unwrap();
        for cost in costs {
            let device = Repository::<Device>::new(&db)
                .add(Device {
                    id: DeviceId::default(),
                    user_id: user.id,
                    room_id: room.id,
                    name: "Ar-condicionado".to_string(),
                    model: "Split 12000".to_string(),
                })
                .await
                .unwrap();
            Repository::<ConsumptionRecord>::new(&db)
                .add(ConsumptionRecord::new(
                    device.id,
                    Decimal::new(500, 0),
                    Decimal::new(*cost, 0),
                ))
                .await
                .unwrap();
        }
        (db, user.id)
    }

    #[tokio::test]
    async fn test_high_spend_gets_tip() {
        let (db, id) = user_with_costs(&[2300]).await;
        let tips = StaticTip::default();

        let evaluation = evaluate_spend(&db, &tips, id).await.unwrap().unwrap();

        assert_eq!(evaluation.level, SpendLevel::Alto);
        assert_eq!(evaluation.message, HIGH_SPEND_MESSAGE);
        assert_eq!(evaluation.tip, MOCK_TIP);
        assert_eq!(tips.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_normal_spend_skips_tip_source() {
        let (db, id) = user_with_costs(&[2200]).await;
        let tips = StaticTip::default();

        let evaluation = evaluate_spend(&db, &tips, id).await.unwrap().unwrap();

        assert_eq!(evaluation.level, SpendLevel::Normal);
        assert_eq!(evaluation.message, NORMAL_SPEND_MESSAGE);
        assert_eq!(evaluation.tip, NORMAL_SPEND_TIP);
        assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_costs_sum_across_devices() {
        let (db, id) = user_with_costs(&[1200, 1200]).await;

        let evaluation = evaluate_spend(&db, &StaticTip::default(), id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(evaluation.level, SpendLevel::Alto);
    }

    #[tokio::test]
    async fn test_exactly_average_is_normal() {
        let (db, id) = user_with_costs(&[2250]).await;

        let evaluation = evaluate_spend(&db, &StaticTip::default(), id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(evaluation.level, SpendLevel::Normal);
    }

    #[tokio::test]
    async fn test_user_without_devices_is_normal() {
        let (db, id) = user_with_costs(&[]).await;

        let evaluation = evaluate_spend(&db, &StaticTip::default(), id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(evaluation.level, SpendLevel::Normal);
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let db = Database::Memory(MemoryStore::new());

        let evaluation = evaluate_spend(&db, &StaticTip::default(), UserId::new(7))
            .await
            .unwrap();

        assert!(evaluation.is_none());
    }

    #[test]
    fn test_evaluation_wire_shape() {
        let evaluation = SpendEvaluation {
            level: SpendLevel::Normal,
            message: NORMAL_SPEND_MESSAGE.to_string(),
            tip: NORMAL_SPEND_TIP.to_string(),
        };

        let value = serde_json::to_value(evaluation).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "avaliacao": "Normal",
                "mensagem": "Seu consumo está dentro da média.",
                "dica": "Continue monitorando seu consumo para manter-se eficiente."
            })
        );
    }
}
