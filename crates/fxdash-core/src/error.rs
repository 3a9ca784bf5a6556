use thiserror::Error;

/// Validation errors raised while turning raw form fields into typed requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("currency pair '{value}' must look like BASE.QUOTE")]
    MalformedCurrencyPair { value: String },

    #[error("invalid bar size '{value}'")]
    InvalidBarSize { value: String },
    #[error("invalid whatToShow '{value}'")]
    InvalidWhatToShow { value: String },
    #[error("invalid duration unit '{value}', expected one of S, D, W, M, Y")]
    InvalidDurationUnit { value: String },
    #[error("duration quantity must be an unsigned integer: '{value}'")]
    InvalidDurationQuantity { value: String },
    #[error("useRTH must be '1' or '0': '{value}'")]
    InvalidUseRth { value: String },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("{field} {value} is out of range (max {max})")]
    TimeOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },

    #[error("order side must be BUY or SELL: '{value}'")]
    InvalidOrderSide { value: String },
    #[error("order type must be MKT or LMT: '{value}'")]
    InvalidOrderType { value: String },
    #[error("trade amount must be a positive integer: '{value}'")]
    InvalidTradeAmount { value: String },
    #[error("trade currency cannot be empty")]
    EmptyTradeCurrency,
    #[error("limit orders require a positive lmtPrice")]
    MissingLimitPrice,
    #[error("secType must be one of CASH, STK, FUT, OPT: '{value}'")]
    InvalidSecType { value: String },
    #[error("contract {contract} does not match trade currency {trade_currency}")]
    InstrumentMismatch {
        contract: String,
        trade_currency: String,
    },

    #[error("invalid broker '{value}', expected one of simulated, client-portal")]
    InvalidBroker { value: String },
}
