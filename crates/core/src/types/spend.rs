//! Spend classification against the national average energy spend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reference spend for a Brazilian household. Totals strictly above it are high.
pub const NATIONAL_AVERAGE_SPEND: Decimal = Decimal::from_parts(2250, 0, 0, false, 0);

/// Outcome of comparing a user's total spend to [`NATIONAL_AVERAGE_SPEND`].
///
/// Serialized with the Portuguese labels the API has always returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpendLevel {
    /// Spend above the reference value.
    Alto,
    /// Spend at or below the reference value.
    Normal,
}

impl SpendLevel {
    /// Classify a total spend.
    #[must_use]
    pub fn classify(total: Decimal) -> Self {
        if total > NATIONAL_AVERAGE_SPEND {
            Self::Alto
        } else {
            Self::Normal
        }
    }

    /// Label used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alto => "Alto",
            Self::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for SpendLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
