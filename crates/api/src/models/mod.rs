//! Domain models for the Ecosave resources.
//!
//! Each model is both the JSON payload (Portuguese camelCase field names) and
//! the database row (English snake_case columns), and implements
//! [`crate::db::Entity`] so the generic repository can persist it.

pub mod address;
pub mod consumption;
pub mod device;
pub mod loyalty_point;
pub mod room;
pub mod user;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

pub use address::Address;
pub use consumption::ConsumptionRecord;
pub use device::{Device, DeviceDetail};
pub use loyalty_point::LoyaltyPoint;
pub use room::Room;
pub use user::{User, UserDetail};

/// A payload field failed its check. Each variant carries the wire name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("O campo '{0}' é obrigatório.")]
    Required(&'static str),

    #[error("O campo '{0}' contém caracteres inválidos.")]
    InvalidCharacters(&'static str),

    #[error("O campo '{0}' deve ser um valor entre 0 e {1}.")]
    OutOfRange(&'static str, Decimal),
}

/// Column precision of a stored amount, as declared in the migrations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Numeric {
    precision: u32,
    scale: u32,
}

impl Numeric {
    /// `NUMERIC(12, 2)`: costs and points.
    pub const MONEY: Self = Self {
        precision: 12,
        scale: 2,
    };
    /// `NUMERIC(12, 3)`: energy readings.
    pub const ENERGY: Self = Self {
        precision: 12,
        scale: 3,
    };

    /// Largest value the column holds.
    fn max(self) -> Decimal {
        let integer_digits = self.precision - self.scale;
        let bound = Decimal::from(10_i64.pow(integer_digits));
        bound - Decimal::new(1, self.scale)
    }
}

/// Field checks run on incoming payloads before they reach storage.
pub trait Validate {
    /// # Errors
    ///
    /// Returns the first field that is blank, malformed or out of range.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// `field` is the wire name reported back to the client.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if value.contains('\0') {
        return Err(ValidationError::InvalidCharacters(field));
    }
    Ok(())
}

/// Non-negative and within `column` once rounded to its scale.
pub(crate) fn require_amount(
    field: &'static str,
    value: Decimal,
    column: Numeric,
) -> Result<(), ValidationError> {
    let max = column.max();
    let stored = value.round_dp_with_strategy(column.scale, RoundingStrategy::MidpointAwayFromZero);
    if stored < Decimal::ZERO || stored > max {
        return Err(ValidationError::OutOfRange(field, max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_whitespace() {
        assert_eq!(require("nome", "   "), Err(ValidationError::Required("nome")));
        assert_eq!(require("nome", ""), Err(ValidationError::Required("nome")));
        assert!(require("nome", "Ana").is_ok());
    }

    #[test]
    fn test_require_rejects_nul_byte() {
        assert_eq!(
            require("descricao", "Bônus\0"),
            Err(ValidationError::InvalidCharacters("descricao"))
        );
    }

    #[test]
    fn test_validation_message_names_field() {
        assert_eq!(
            ValidationError::Required("cpf").to_string(),
            "O campo 'cpf' é obrigatório."
        );
        assert_eq!(
            ValidationError::OutOfRange("custo", Numeric::MONEY.max()).to_string(),
            "O campo 'custo' deve ser um valor entre 0 e 9999999999.99."
        );
    }

    #[test]
    fn test_column_bounds() {
        assert_eq!(Numeric::MONEY.max(), Decimal::new(999_999_999_999, 2));
        assert_eq!(Numeric::ENERGY.max(), Decimal::new(999_999_999_999, 3));
    }

    #[test]
    fn test_require_amount_bounds() {
        let money = Numeric::MONEY;
        assert!(require_amount("custo", Decimal::ZERO, money).is_ok());
        assert!(require_amount("custo", Decimal::new(999_999_999_999, 2), money).is_ok());
        assert_eq!(
            require_amount("custo", Decimal::new(-500, 0), money),
            Err(ValidationError::OutOfRange("custo", money.max()))
        );
        assert!(require_amount("custo", Decimal::new(100_000_000_000, 0), money).is_err());
        // Rounds up past the column limit once stored.
        assert!(require_amount("custo", Decimal::new(9_999_999_999_995, 3), money).is_err());
        assert!(require_amount("custo", Decimal::MAX, money).is_err());
    }
}
