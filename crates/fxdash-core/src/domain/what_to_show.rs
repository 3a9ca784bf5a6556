use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Kind of data requested from the historical-data capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhatToShow {
    Trades,
    Midpoint,
    Bid,
    Ask,
    BidAsk,
    HistoricalVolatility,
    OptionImpliedVolatility,
    RebateRate,
    FeeRate,
    Schedule,
}

impl WhatToShow {
    pub const ALL: [Self; 10] = [
        Self::Trades,
        Self::Midpoint,
        Self::Bid,
        Self::Ask,
        Self::BidAsk,
        Self::HistoricalVolatility,
        Self::OptionImpliedVolatility,
        Self::RebateRate,
        Self::FeeRate,
        Self::Schedule,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trades => "TRADES",
            Self::Midpoint => "MIDPOINT",
            Self::Bid => "BID",
            Self::Ask => "ASK",
            Self::BidAsk => "BID_ASK",
            Self::HistoricalVolatility => "HISTORICAL_VOLATILITY",
            Self::OptionImpliedVolatility => "OPTION_IMPLIED_VOLATILITY",
            Self::RebateRate => "REBATE_RATE",
            Self::FeeRate => "FEE_RATE",
            Self::Schedule => "SCHEDULE",
        }
    }
}

impl Display for WhatToShow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WhatToShow {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidWhatToShow {
                value: value.to_owned(),
            })
    }
}

/// Regular-trading-hours flag, carried on the wire as `"1"` / `"0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UseRth {
    RegularHoursOnly,
    AllHours,
}

impl UseRth {
    pub const ALL: [Self; 2] = [Self::RegularHoursOnly, Self::AllHours];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegularHoursOnly => "1",
            Self::AllHours => "0",
        }
    }

    pub const fn regular_hours_only(self) -> bool {
        matches!(self, Self::RegularHoursOnly)
    }
}

impl Display for UseRth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseRth {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1" => Ok(Self::RegularHoursOnly),
            "0" => Ok(Self::AllHours),
            other => Err(ValidationError::InvalidUseRth {
                value: other.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for UseRth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UseRth> for String {
    fn from(value: UseRth) -> Self {
        value.as_str().to_owned()
    }
}
