use ecosave_core::{LoyaltyPointId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Numeric, Validate, ValidationError, require, require_amount};
use crate::db::{Entity, ForeignKey, Reference, SqlValue};

/// Reward points credited to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoyaltyPoint {
    #[serde(default)]
    pub id: LoyaltyPointId,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "valorPonto", with = "rust_decimal::serde::float")]
    pub points: Decimal,
    #[serde(rename = "descricao")]
    pub description: String,
}

impl LoyaltyPoint {
    pub const OWNER: ForeignKey = ForeignKey::new("user_id", "users");
}

impl Entity for LoyaltyPoint {
    type Id = LoyaltyPointId;

    const TABLE: &'static str = "loyalty_points";
    const COLUMNS: &'static [&'static str] = &["user_id", "points", "description"];

    fn id(&self) -> LoyaltyPointId {
        self.id
    }

    fn with_id(self, id: LoyaltyPointId) -> Self {
        Self { id, ..self }
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.as_i32().into(),
            self.points.into(),
            (&self.description).into(),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        vec![Self::OWNER.to(self.user_id)]
    }
}

impl Validate for LoyaltyPoint {
    fn validate(&self) -> Result<(), ValidationError> {
        require_amount("valorPonto", self.points, Numeric::MONEY)?;
        require("descricao", &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(points: Decimal) -> LoyaltyPoint {
        LoyaltyPoint {
            id: LoyaltyPointId::default(),
            user_id: UserId::new(1),
            points,
            description: "Cadastro".to_string(),
        }
    }

    #[test]
    fn test_points_must_fit_column() {
        assert_eq!(point(Decimal::new(50, 0)).validate(), Ok(()));
        assert!(matches!(
            point(Decimal::new(-1, 0)).validate(),
            Err(ValidationError::OutOfRange("valorPonto", _))
        ));
        assert!(point(Decimal::MAX).validate().is_err());
    }
}
