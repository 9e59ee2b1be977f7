//! User domain types.

use ecosave_core::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Address, DeviceDetail, LoyaltyPoint, Validate, ValidationError, require};
use crate::db::{Entity, SqlValue};

/// An account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned key; zero or absent on create.
    #[serde(default)]
    pub id: UserId,
    /// Full name.
    #[serde(rename = "nome")]
    pub name: String,
    /// CPF (Brazilian taxpayer id), stored as typed.
    #[serde(rename = "cpf")]
    pub tax_id: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
}

impl Entity for User {
    type Id = UserId;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "tax_id", "email", "phone"];

    fn id(&self) -> UserId {
        self.id
    }

    fn with_id(self, id: UserId) -> Self {
        Self { id, ..self }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            (&self.name).into(),
            (&self.tax_id).into(),
            (&self.email).into(),
            (&self.phone).into(),
        ]
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationError> {
        require("nome", &self.name)?;
        require("cpf", &self.tax_id)?;
        require("email", &self.email)?;
        require("telefone", &self.phone)
    }
}

/// A user together with the collections a fetch plan loaded.
///
/// Collections that were not loaded are omitted from the JSON entirely, so a
/// client can tell "not requested" from "empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "enderecos", skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(rename = "pontos", skip_serializing_if = "Option::is_none")]
    pub loyalty_points: Option<Vec<LoyaltyPoint>>,
    #[serde(rename = "dispositivos", skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceDetail>>,
    /// Total consumption cost across all devices. Present only when
    /// consumption records were hydrated.
    #[serde(
        rename = "gastoMedio",
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub average_spend: Option<Decimal>,
}

impl UserDetail {
    #[must_use]
    pub fn new(
        user: User,
        addresses: Option<Vec<Address>>,
        loyalty_points: Option<Vec<LoyaltyPoint>>,
        devices: Option<Vec<DeviceDetail>>,
    ) -> Self {
        Self {
            user,
            addresses,
            loyalty_points,
            devices,
            average_spend: None,
        }
    }

    /// Fill in `gastoMedio` from the hydrated consumption records.
    ///
    /// `None` if the total does not fit in a `Decimal`.
    #[must_use]
    pub fn with_average_spend(mut self) -> Option<Self> {
        let total = self
            .devices
            .iter()
            .flatten()
            .flat_map(|device| device.consumption.iter().flatten())
            .try_fold(Decimal::ZERO, |total, record| total.checked_add(record.cost))?;
        self.average_spend = Some(total);
        Some(self)
    }

    /// Total consumption cost, zero when nothing was hydrated.
    #[must_use]
    pub fn total_spend(&self) -> Decimal {
        self.average_spend.unwrap_or_default()
    }
}
