use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BarSize, CurrencyPair, ValidationError};

/// One OHLC bucket as returned by the brokerage.
///
/// Values are not validated; whatever the brokerage returns is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(date: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date: date.into(),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Bars for one pair, in the order the brokerage returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub pair: CurrencyPair,
    pub bar_size: BarSize,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(pair: CurrencyPair, bar_size: BarSize, bars: Vec<Bar>) -> Self {
        Self {
            pair,
            bar_size,
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const ALL: [Self; 2] = [Self::Buy, Self::Sell];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl Display for OrderSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(ValidationError::InvalidOrderSide {
                value: other.to_owned(),
            }),
        }
    }
}

/// Market or limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Mkt,
    Lmt,
}

impl OrderType {
    pub const ALL: [Self; 2] = [Self::Mkt, Self::Lmt];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mkt => "MKT",
            Self::Lmt => "LMT",
        }
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "MKT" => Ok(Self::Mkt),
            "LMT" => Ok(Self::Lmt),
            other => Err(ValidationError::InvalidOrderType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Structured order built from the trade form. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOrder {
    pub side: OrderSide,
    pub currency_pair: String,
    pub quantity: u64,
    pub order_type: OrderType,
    pub limit_price: Option<f64>,
}

/// Brokerage acknowledgement for a transmitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
    pub status: String,
}
