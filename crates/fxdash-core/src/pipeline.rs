//! History section handler: build, resolve, verify, fetch, chart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::validate::verify_contract;
use crate::{Brokerage, CandlestickFigure, ContractCheck, HistoricalDataRequest, HistoryForm};

/// What the history section renders after a submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryOutcome {
    pub message: String,
    pub figure: CandlestickFigure,
}

impl HistoryOutcome {
    fn stopped(message: String) -> Self {
        Self {
            message,
            figure: CandlestickFigure::empty(),
        }
    }
}

/// Runs one submit of the history form against a brokerage.
///
/// Every failure ends in a message plus an empty figure; the historical-data
/// capability is only called after the contract check matched.
#[derive(Clone)]
pub struct HistoryPipeline {
    broker: Arc<dyn Brokerage>,
}

impl HistoryPipeline {
    pub fn new(broker: Arc<dyn Brokerage>) -> Self {
        Self { broker }
    }

    #[instrument(skip_all, fields(broker = %self.broker.id(), currency = %form.currency))]
    pub async fn run(&self, form: &HistoryForm) -> HistoryOutcome {
        let mut request = match HistoricalDataRequest::from_form(form) {
            Ok(request) => request,
            Err(error) => {
                warn!(%error, "history form rejected");
                return HistoryOutcome::stopped(format!(
                    "Error: {error}! Please check your input!"
                ));
            }
        };

        let resolution = self.broker.resolve_contract(&request.contract).await;
        let message = match verify_contract(resolution, &form.currency) {
            ContractCheck::Matched { message, details } => {
                request.contract = details.contract;
                message
            }
            ContractCheck::Rejected(message) => return HistoryOutcome::stopped(message),
        };

        info!(
            con_id = request.contract.con_id,
            end_date_time = %request.end_date_time,
            duration = %request.duration,
            bar_size = %request.bar_size,
            what_to_show = %request.what_to_show,
            use_rth = %request.use_rth,
            "requesting historical data"
        );
        let series = match self.broker.historical_data(&request).await {
            Ok(series) => series,
            Err(error) => {
                warn!(code = error.code(), "historical data request failed");
                return HistoryOutcome::stopped(format!(
                    "Historical data request failed: {}",
                    error.message()
                ));
            }
        };

        info!(bars = series.bars.len(), "historical data received");
        HistoryOutcome {
            message,
            figure: CandlestickFigure::from_series(&series, &form.currency),
        }
    }
}
