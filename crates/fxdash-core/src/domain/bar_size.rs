use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Bar granularities accepted by the historical-data capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BarSize {
    OneSecond,
    FiveSeconds,
    FifteenSeconds,
    ThirtySeconds,
    OneMinute,
    TwoMinutes,
    ThreeMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
}

impl BarSize {
    pub const ALL: [Self; 12] = [
        Self::OneSecond,
        Self::FiveSeconds,
        Self::FifteenSeconds,
        Self::ThirtySeconds,
        Self::OneMinute,
        Self::TwoMinutes,
        Self::ThreeMinutes,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::OneDay,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneSecond => "1 sec",
            Self::FiveSeconds => "5 secs",
            Self::FifteenSeconds => "15 secs",
            Self::ThirtySeconds => "30 secs",
            Self::OneMinute => "1 min",
            Self::TwoMinutes => "2 mins",
            Self::ThreeMinutes => "3 mins",
            Self::FiveMinutes => "5 mins",
            Self::FifteenMinutes => "15 mins",
            Self::ThirtyMinutes => "30 mins",
            Self::OneHour => "1 hour",
            Self::OneDay => "1 day",
        }
    }

    /// Bucket length in seconds.
    pub const fn seconds(self) -> i64 {
        match self {
            Self::OneSecond => 1,
            Self::FiveSeconds => 5,
            Self::FifteenSeconds => 15,
            Self::ThirtySeconds => 30,
            Self::OneMinute => 60,
            Self::TwoMinutes => 120,
            Self::ThreeMinutes => 180,
            Self::FiveMinutes => 300,
            Self::FifteenMinutes => 900,
            Self::ThirtyMinutes => 1_800,
            Self::OneHour => 3_600,
            Self::OneDay => 86_400,
        }
    }
}

impl Display for BarSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarSize {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidBarSize {
                value: value.to_owned(),
            })
    }
}

impl TryFrom<String> for BarSize {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BarSize> for String {
    fn from(value: BarSize) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_bar_sizes() {
        assert_eq!(BarSize::from_str("1 day").expect("must parse"), BarSize::OneDay);
        assert_eq!(BarSize::from_str("15 mins").expect("must parse"), BarSize::FifteenMinutes);
    }

    #[test]
    fn rejects_unlisted_bar_size() {
        let err = BarSize::from_str("2 hours").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarSize { .. }));
    }

    #[test]
    fn serializes_as_literal() {
        let json = serde_json::to_string(&BarSize::FiveSeconds).expect("serialize");
        assert_eq!(json, "\"5 secs\"");
    }
}
