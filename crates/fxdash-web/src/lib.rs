//! # fxdash Web
//!
//! Axum server for the fxdash dashboard: serves the page and the JSON
//! endpoints behind its two sections.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::{BrokerSelector, Cli, LogFormat};
pub use error::WebError;
pub use routes::router;
pub use state::AppState;
