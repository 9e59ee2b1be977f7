use ecosave_core::{AddressId, UserId};
use serde::{Deserialize, Serialize};

use super::{Validate, ValidationError, require};
use crate::db::{Entity, ForeignKey, Reference, SqlValue};

/// A postal address owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    #[serde(default)]
    pub id: AddressId,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    /// CEP, kept as typed (with or without the dash).
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "numero")]
    pub number: i32,
    #[serde(rename = "complemento")]
    pub complement: String,
}

impl Address {
    pub const OWNER: ForeignKey = ForeignKey::new("user_id", "users");
}

impl Entity for Address {
    type Id = AddressId;

    const TABLE: &'static str = "addresses";
    const COLUMNS: &'static [&'static str] = &["user_id", "postal_code", "number", "complement"];

    fn id(&self) -> AddressId {
        self.id
    }

    fn with_id(self, id: AddressId) -> Self {
        Self { id, ..self }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.as_i32().into(),
            (&self.postal_code).into(),
            self.number.into(),
            (&self.complement).into(),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        vec![Self::OWNER.to(self.user_id)]
    }
}

impl Validate for Address {
    fn validate(&self) -> Result<(), ValidationError> {
        require("cep", &self.postal_code)?;
        require("complemento", &self.complement)
    }
}
