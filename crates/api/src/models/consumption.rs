use ecosave_core::{ConsumptionId, DeviceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Numeric, Validate, ValidationError, require_amount};
use crate::db::{Entity, ForeignKey, Reference, SqlValue};

/// One energy reading of a device and what it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConsumptionRecord {
    #[serde(default)]
    pub id: ConsumptionId,
    #[serde(rename = "idDispositivo")]
    pub device_id: DeviceId,
    #[serde(rename = "consumoKWh", with = "rust_decimal::serde::float")]
    pub energy_kwh: Decimal,
    #[serde(rename = "custo", with = "rust_decimal::serde::float")]
    pub cost: Decimal,
}

impl ConsumptionRecord {
    pub const DEVICE: ForeignKey = ForeignKey::new("device_id", "devices");

    /// A reading not yet stored.
    #[must_use]
    pub fn new(device_id: DeviceId, energy_kwh: Decimal, cost: Decimal) -> Self {
        Self {
            id: ConsumptionId::default(),
            device_id,
            energy_kwh,
            cost,
        }
    }
}

impl Entity for ConsumptionRecord {
    type Id = ConsumptionId;

    const TABLE: &'static str = "consumption_records";
    const COLUMNS: &'static [&'static str] = &["device_id", "energy_kwh", "cost"];

    fn id(&self) -> ConsumptionId {
        self.id
    }

    fn with_id(self, id: ConsumptionId) -> Self {
        Self { id, ..self }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.device_id.as_i32().into(),
            self.energy_kwh.into(),
            self.cost.into(),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        vec![Self::DEVICE.to(self.device_id)]
    }
}

impl Validate for ConsumptionRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount("consumoKWh", self.energy_kwh, Numeric::ENERGY)?;
        require_amount("custo", self.cost, Numeric::MONEY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_amounts_are_json_numbers() {
        let record = ConsumptionRecord {
            id: ConsumptionId::new(4),
            device_id: DeviceId::new(2),
            energy_kwh: Decimal::new(1255, 1),
            cost: Decimal::new(9990, 2),
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({"id": 4, "idDispositivo": 2, "consumoKWh": 125.5, "custo": 99.9})
        );
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        let record =
            ConsumptionRecord::new(DeviceId::new(1), Decimal::new(10, 0), Decimal::new(-500, 0));
        assert!(matches!(
            record.validate(),
            Err(ValidationError::OutOfRange("custo", _))
        ));
    }

    #[test]
    fn test_negative_energy_is_rejected() {
        let record = ConsumptionRecord::new(DeviceId::new(1), Decimal::new(-10, 0), Decimal::ONE);
        assert!(matches!(
            record.validate(),
            Err(ValidationError::OutOfRange("consumoKWh", _))
        ));
    }

    #[test]
    fn test_cost_beyond_column_is_rejected() {
        let record: ConsumptionRecord =
            serde_json::from_value(json!({"idDispositivo": 1, "consumoKWh": 1, "custo": 7e28}))
                .unwrap();
        assert!(matches!(
            record.validate(),
            Err(ValidationError::OutOfRange("custo", _))
        ));

        let record = ConsumptionRecord::new(
            DeviceId::new(1),
            Decimal::ONE,
            Decimal::new(100_000_000_000, 0),
        );
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_reading_within_bounds_is_valid() {
        let record = ConsumptionRecord::new(
            DeviceId::new(1),
            Decimal::new(3005, 1),
            Decimal::new(120_050, 2),
        );
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn test_accepts_integer_amounts() {
        let record: ConsumptionRecord =
            serde_json::from_value(json!({"idDispositivo": 1, "consumoKWh": 300, "custo": 1200}))
                .unwrap();

        assert_eq!(record.cost, Decimal::new(1200, 0));
        assert_eq!(record.id, ConsumptionId::default());
    }
}
