use ecosave_core::{DeviceId, RoomId, UserId};
use serde::{Deserialize, Serialize};

use super::{ConsumptionRecord, Validate, ValidationError, require};
use crate::db::{Entity, ForeignKey, Reference, SqlValue};

/// An appliance owned by a user and installed in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    #[serde(default)]
    pub id: DeviceId,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "idComodo")]
    pub room_id: RoomId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "modelo")]
    pub model: String,
}

impl Device {
    pub const OWNER: ForeignKey = ForeignKey::new("user_id", "users");
    pub const ROOM: ForeignKey = ForeignKey::new("room_id", "rooms");
}

impl Entity for Device {
    type Id = DeviceId;

    const TABLE: &'static str = "devices";
    const COLUMNS: &'static [&'static str] = &["user_id", "room_id", "name", "model"];

    fn id(&self) -> DeviceId {
        self.id
    }

    fn with_id(self, id: DeviceId) -> Self {
        Self { id, ..self }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.as_i32().into(),
            self.room_id.as_i32().into(),
            (&self.name).into(),
            (&self.model).into(),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        vec![Self::OWNER.to(self.user_id), Self::ROOM.to(self.room_id)]
    }
}

impl Validate for Device {
    fn validate(&self) -> Result<(), ValidationError> {
        require("nome", &self.name)?;
        require("modelo", &self.model)
    }
}

/// A device inside a user aggregate, with its readings when they were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDetail {
    #[serde(flatten)]
    pub device: Device,
    #[serde(rename = "consumos", skip_serializing_if = "Option::is_none")]
    pub consumption: Option<Vec<ConsumptionRecord>>,
}

impl DeviceDetail {
    #[must_use]
    pub const fn bare(device: Device) -> Self {
        Self {
            device,
            consumption: None,
        }
    }

    #[must_use]
    pub const fn with_consumption(device: Device, records: Vec<ConsumptionRecord>) -> Self {
        Self {
            device,
            consumption: Some(records),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn heater() -> Device {
        Device {
            id: DeviceId::new(8),
            user_id: UserId::new(1),
            room_id: RoomId::new(2),
            name: "Aquecedor".to_string(),
            model: "AQ-1500".to_string(),
        }
    }

    #[test]
    fn test_device_references_owner_and_room() {
        let refs = heater().references();
        assert_eq!(refs, vec![Device::OWNER.to(1), Device::ROOM.to(2)]);
    }

    #[test]
    fn test_blank_model_fails_validation() {
        let mut device = heater();
        device.model = String::new();
        assert_eq!(device.validate(), Err(ValidationError::Required("modelo")));
    }

    #[test]
    fn test_detail_flattens_device() {
        let detail = DeviceDetail::with_consumption(heater(), Vec::new());
        let value = serde_json::to_value(detail).unwrap();

        assert_eq!(value["idComodo"], json!(2));
        assert_eq!(value["modelo"], json!("AQ-1500"));
        assert_eq!(value["consumos"], json!([]));

        let bare = serde_json::to_value(DeviceDetail::bare(heater())).unwrap();
        assert!(bare.get("consumos").is_none());
    }
}
