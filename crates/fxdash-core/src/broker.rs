//! Brokerage capability contract.
//!
//! The dashboard never talks to a brokerage directly; it goes through
//! [`Brokerage`], which exposes the three capabilities the pages need.
//!
//! | Capability | Input | Output |
//! |------------|-------|--------|
//! | [`resolve_contract`](Brokerage::resolve_contract) | [`Contract`] | [`ContractDetails`] |
//! | [`historical_data`](Brokerage::historical_data) | [`HistoricalDataRequest`] | [`BarSeries`] |
//! | [`place_order`](Brokerage::place_order) | [`Contract`] + [`TradeOrder`] | [`OrderAck`] |
//!
//! Failures are explicit [`BrokerError`] values instead of error strings.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BarSeries, Contract, ContractDetails, HistoricalDataRequest, OrderAck, TradeOrder, ValidationError};

/// Boxed future returned by brokerage capabilities.
pub type BrokerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BrokerError>> + Send + 'a>>;

/// Brokerage backend identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrokerId {
    Simulated,
    ClientPortal,
}

impl BrokerId {
    pub const ALL: [Self; 2] = [Self::Simulated, Self::ClientPortal];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::ClientPortal => "client-portal",
        }
    }
}

impl Display for BrokerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrokerId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "client-portal" | "client_portal" => Ok(Self::ClientPortal),
            other => Err(ValidationError::InvalidBroker {
                value: other.to_owned(),
            }),
        }
    }
}

/// Brokerage error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerErrorKind {
    NotFound,
    Unavailable,
    Rejected,
    InvalidRequest,
    Internal,
}

/// Structured brokerage failure surfaced to the user as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerError {
    kind: BrokerErrorKind,
    message: String,
}

impl BrokerError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::Unavailable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::Rejected, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::Internal, message)
    }

    fn new(kind: BrokerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> BrokerErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            BrokerErrorKind::NotFound => "broker.not_found",
            BrokerErrorKind::Unavailable => "broker.unavailable",
            BrokerErrorKind::Rejected => "broker.rejected",
            BrokerErrorKind::InvalidRequest => "broker.invalid_request",
            BrokerErrorKind::Internal => "broker.internal",
        }
    }
}

impl Display for BrokerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for BrokerError {}

/// Brokerage adapter contract.
///
/// Implementations must be `Send + Sync`; one instance is built at startup
/// and shared by every request handler.
pub trait Brokerage: Send + Sync {
    fn id(&self) -> BrokerId;

    /// Resolves an instrument identifier into the brokerage's description.
    ///
    /// # Errors
    ///
    /// [`BrokerErrorKind::NotFound`] when no security definition matches.
    fn resolve_contract<'a>(&'a self, contract: &'a Contract) -> BrokerFuture<'a, ContractDetails>;

    /// Fetches bars for an already validated request.
    fn historical_data<'a>(
        &'a self,
        request: &'a HistoricalDataRequest,
    ) -> BrokerFuture<'a, BarSeries>;

    /// Transmits an order.
    fn place_order<'a>(
        &'a self,
        contract: &'a Contract,
        order: &'a TradeOrder,
    ) -> BrokerFuture<'a, OrderAck>;
}
