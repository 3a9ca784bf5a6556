use std::sync::Arc;

use fxdash_core::{
    BrokerId, Brokerage, ClientPortalBrokerage, HistoryPipeline, OrderSubmitter,
    ReqwestHttpClient, SimulatedBrokerage,
};
use tracing::info;

use crate::config::Cli;
use crate::error::WebError;

/// Process-wide application state, built once at startup and shared by all
/// handlers until exit.
#[derive(Clone)]
pub struct AppState {
    broker: Arc<dyn Brokerage>,
    history: HistoryPipeline,
    orders: OrderSubmitter,
}

impl AppState {
    pub fn new(broker: Arc<dyn Brokerage>, transmit_orders: bool) -> Self {
        let orders = if transmit_orders {
            OrderSubmitter::transmitting(broker.clone())
        } else {
            OrderSubmitter::confirm_only()
        };

        Self {
            history: HistoryPipeline::new(broker.clone()),
            orders,
            broker,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, WebError> {
        let broker: Arc<dyn Brokerage> = match BrokerId::from(cli.broker) {
            BrokerId::Simulated => Arc::new(SimulatedBrokerage::new()),
            BrokerId::ClientPortal => {
                let http_client = if cli.accept_invalid_certs {
                    ReqwestHttpClient::accepting_invalid_certs()?
                } else {
                    ReqwestHttpClient::new()
                };
                Arc::new(ClientPortalBrokerage::new(
                    Arc::new(http_client),
                    cli.client_portal_config(),
                ))
            }
        };

        info!(
            broker = %broker.id(),
            transmit_orders = cli.transmit_orders,
            "brokerage configured"
        );
        Ok(Self::new(broker, cli.transmit_orders))
    }

    pub fn broker_id(&self) -> BrokerId {
        self.broker.id()
    }

    pub fn history(&self) -> &HistoryPipeline {
        &self.history
    }

    pub fn orders(&self) -> &OrderSubmitter {
        &self.orders
    }
}
