//! # Domain Models
//!
//! Typed values behind every dashboard form field.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CurrencyPair`] | `BASE.QUOTE` pair, case preserved |
//! | [`BarSize`] | Bar granularity literal (`1 day`, `5 mins`, ...) |
//! | [`WhatToShow`] | Data kind literal (`MIDPOINT`, `BID_ASK`, ...) |
//! | [`UseRth`] | Regular-trading-hours flag (`"1"` / `"0"`) |
//! | [`DurationSpec`] | `"<integer> <unit>"` duration |
//! | [`EndDateTime`] | End of the history window, or "now" |
//! | [`Contract`] | Instrument identifier |
//! | [`ContractDetails`] | Resolved contract description |
//! | [`Bar`] / [`BarSeries`] | OHLC rows as returned by the brokerage |
//! | [`TradeOrder`] | Order built from the trade form |
//!
//! Form enums (de)serialize to the exact literals the brokerage expects, so a
//! value that made it into a request is always a member of its enumeration.

mod bar_size;
mod contract;
mod duration;
mod end_time;
mod models;
mod pair;
mod what_to_show;

pub use bar_size::BarSize;
pub use contract::{Contract, ContractDetails, SecType, FX_EXCHANGE, PAIR_FIELD_INDEX};
pub use duration::{DurationSpec, DurationUnit};
pub use end_time::{EndDateTime, EndTimestamp, END_TIME_ZONE};
pub use models::{Bar, BarSeries, OrderAck, OrderSide, OrderType, TradeOrder};
pub use pair::CurrencyPair;
pub use what_to_show::{UseRth, WhatToShow};
