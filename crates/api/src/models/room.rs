use ecosave_core::RoomId;
use serde::{Deserialize, Serialize};

use super::{Validate, ValidationError, require};
use crate::db::{Entity, SqlValue};

/// A room devices are installed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    #[serde(default)]
    pub id: RoomId,
    #[serde(rename = "nome")]
    pub name: String,
}

impl Entity for Room {
    type Id = RoomId;

    const TABLE: &'static str = "rooms";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> RoomId {
        self.id
    }

    fn with_id(self, id: RoomId) -> Self {
        Self { id, ..self }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![(&self.name).into()]
    }
}

impl Validate for Room {
    fn validate(&self) -> Result<(), ValidationError> {
        require("nome", &self.name)
    }
}
