use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Unit code of the brokerage duration grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    #[serde(rename = "S")]
    Seconds,
    #[serde(rename = "D")]
    Days,
    #[serde(rename = "W")]
    Weeks,
    #[serde(rename = "M")]
    Months,
    #[serde(rename = "Y")]
    Years,
}

impl DurationUnit {
    pub const ALL: [Self; 5] = [
        Self::Seconds,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Seconds => "S",
            Self::Days => "D",
            Self::Weeks => "W",
            Self::Months => "M",
            Self::Years => "Y",
        }
    }

    /// Approximate span in seconds, used by offline bar generation.
    pub const fn approx_seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Days => 86_400,
            Self::Weeks => 7 * 86_400,
            Self::Months => 30 * 86_400,
            Self::Years => 365 * 86_400,
        }
    }
}

impl Display for DurationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DurationUnit {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "S" => Ok(Self::Seconds),
            "D" => Ok(Self::Days),
            "W" => Ok(Self::Weeks),
            "M" => Ok(Self::Months),
            "Y" => Ok(Self::Years),
            other => Err(ValidationError::InvalidDurationUnit {
                value: other.to_owned(),
            }),
        }
    }
}

/// `"<integer> <unit>"` duration, e.g. `20 D`. The quantity is not bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DurationSpec {
    pub quantity: u32,
    pub unit: DurationUnit,
}

impl DurationSpec {
    pub const fn new(quantity: u32, unit: DurationUnit) -> Self {
        Self { quantity, unit }
    }

    /// Build from the two raw form fields.
    pub fn from_parts(number: &str, unit: &str) -> Result<Self, ValidationError> {
        let quantity = number.trim().parse::<u32>().map_err(|_| {
            ValidationError::InvalidDurationQuantity {
                value: number.to_owned(),
            }
        })?;
        Ok(Self::new(quantity, DurationUnit::from_str(unit)?))
    }

    pub fn approx_seconds(self) -> i64 {
        i64::from(self.quantity) * self.unit.approx_seconds()
    }
}

impl Display for DurationSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.quantity, self.unit.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_quantity_space_unit_for_every_unit() {
        for unit in DurationUnit::ALL {
            let spec = DurationSpec::from_parts("20", unit.code()).expect("must parse");
            assert_eq!(spec.to_string(), format!("20 {}", unit.code()));
        }
    }

    #[test]
    fn zero_quantity_is_not_rejected() {
        let spec = DurationSpec::from_parts("0", "W").expect("no bounds check");
        assert_eq!(spec.to_string(), "0 W");
    }

    #[test]
    fn rejects_unknown_unit_and_non_numeric_quantity() {
        assert!(matches!(
            DurationSpec::from_parts("20", "H"),
            Err(ValidationError::InvalidDurationUnit { .. })
        ));
        assert!(matches!(
            DurationSpec::from_parts("twenty", "D"),
            Err(ValidationError::InvalidDurationQuantity { .. })
        ));
    }
}
