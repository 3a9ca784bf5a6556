//! # fxdash Core
//!
//! Request building, contract validation and brokerage contracts behind the
//! fxdash dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Brokerage adapters (simulated, IBKR Client Portal) |
//! | [`broker`] | [`Brokerage`] trait and [`BrokerError`] |
//! | [`chart`] | Plotly-compatible candlestick figure |
//! | [`domain`] | Typed form values, contracts, bars, orders |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`order`] | Trade form handling and opt-in transmission |
//! | [`pipeline`] | History form handling end to end |
//! | [`request`] | Historical-data request builder |
//! | [`validate`] | Resolved-contract check |
//!
//! ## Flow
//!
//! ```text
//! HistoryForm ──▶ HistoricalDataRequest ──▶ resolve_contract ──▶ verify_contract
//!                                                                    │
//!                      CandlestickFigure ◀── historical_data ◀───────┘ (matched)
//! ```
//!
//! Any failure along the way yields a user-facing message and an empty
//! figure; the historical-data capability is only reached after a match.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fxdash_core::{HistoryForm, HistoryPipeline, SimulatedBrokerage};
//!
//! let pipeline = HistoryPipeline::new(Arc::new(SimulatedBrokerage::new()));
//! let outcome = pipeline.run(&HistoryForm::default()).await;
//! println!("{}", outcome.message);
//! ```

pub mod adapters;
pub mod broker;
pub mod chart;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod order;
pub mod pipeline;
pub mod request;
pub mod validate;

pub use adapters::{ClientPortalBrokerage, ClientPortalConfig, SimulatedBrokerage};

pub use broker::{BrokerError, BrokerErrorKind, BrokerFuture, BrokerId, Brokerage};

pub use chart::{CandlestickFigure, CandlestickTrace, TITLE_PREFIX};

pub use domain::{
    Bar, BarSeries, BarSize, Contract, ContractDetails, CurrencyPair, DurationSpec, DurationUnit,
    EndDateTime, EndTimestamp, OrderAck, OrderSide, OrderType, SecType, TradeOrder, UseRth,
    WhatToShow, END_TIME_ZONE, FX_EXCHANGE, PAIR_FIELD_INDEX,
};

pub use error::ValidationError;

pub use http_client::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use order::{contract_from_form, OrderSubmitter, TradeForm, TradeOutcome};

pub use pipeline::{HistoryOutcome, HistoryPipeline};

pub use request::{HistoricalDataRequest, HistoryForm};

pub use validate::{verify_contract, ContractCheck};
