//! Server configuration.
//!
//! Every option can be given as a flag or through its `FXDASH_*` environment
//! variable; flags win.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--bind` | `FXDASH_BIND` | `127.0.0.1:8050` |
//! | `--broker` | `FXDASH_BROKER` | `simulated` |
//! | `--gateway-url` | `FXDASH_GATEWAY_URL` | `https://localhost:5000/v1/api` |
//! | `--account-id` | `FXDASH_ACCOUNT_ID` | none |
//! | `--accept-invalid-certs` | `FXDASH_ACCEPT_INVALID_CERTS` | `false` |
//! | `--timeout-ms` | `FXDASH_TIMEOUT_MS` | `10000` |
//! | `--requests-per-second` | `FXDASH_REQUESTS_PER_SECOND` | `10` |
//! | `--transmit-orders` | `FXDASH_TRANSMIT_ORDERS` | `false` |
//! | `--log-format` | `FXDASH_LOG_FORMAT` | `text` |

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use fxdash_core::{BrokerId, ClientPortalConfig};

/// FX history and order dashboard.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fxdash",
    author,
    version,
    about = "FX history and order dashboard",
    long_about = "Serves a browser dashboard that fetches historical FX candlesticks from a \
brokerage and builds simple buy/sell orders.\n\
\n\
Use '--broker client-portal' with an authenticated IBKR Client Portal gateway, or the \
default 'simulated' broker for offline use."
)]
pub struct Cli {
    /// Address the HTTP server listens on.
    #[arg(long, env = "FXDASH_BIND", default_value = "127.0.0.1:8050")]
    pub bind: SocketAddr,

    /// Brokerage backend.
    #[arg(long, env = "FXDASH_BROKER", value_enum, default_value_t = BrokerSelector::Simulated)]
    pub broker: BrokerSelector,

    /// Client Portal gateway API root.
    #[arg(long, env = "FXDASH_GATEWAY_URL", default_value = "https://localhost:5000/v1/api")]
    pub gateway_url: String,

    /// Brokerage account used when orders are transmitted.
    #[arg(long, env = "FXDASH_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Accept the gateway's self-signed TLS certificate.
    #[arg(long, env = "FXDASH_ACCEPT_INVALID_CERTS", default_value_t = false)]
    pub accept_invalid_certs: bool,

    /// Per-request timeout for brokerage calls, in milliseconds.
    #[arg(long, env = "FXDASH_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Gateway pacing limit.
    #[arg(long, env = "FXDASH_REQUESTS_PER_SECOND", default_value_t = 10)]
    pub requests_per_second: u32,

    /// Send built orders to the brokerage instead of only confirming them.
    #[arg(long, env = "FXDASH_TRANSMIT_ORDERS", default_value_t = false)]
    pub transmit_orders: bool,

    /// Log output format.
    #[arg(long, env = "FXDASH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Brokerage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrokerSelector {
    /// Deterministic offline brokerage.
    Simulated,
    /// IBKR Client Portal Web API gateway.
    ClientPortal,
}

impl From<BrokerSelector> for BrokerId {
    fn from(value: BrokerSelector) -> Self {
        match value {
            BrokerSelector::Simulated => BrokerId::Simulated,
            BrokerSelector::ClientPortal => BrokerId::ClientPortal,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl Cli {
    pub fn client_portal_config(&self) -> ClientPortalConfig {
        ClientPortalConfig {
            base_url: self.gateway_url.clone(),
            account_id: self.account_id.clone(),
            timeout_ms: self.timeout_ms,
            requests_per_second: self.requests_per_second,
        }
    }
}
