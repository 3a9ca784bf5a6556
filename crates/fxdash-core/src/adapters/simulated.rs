use std::sync::atomic::{AtomicU64, Ordering};

use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::format_bar_date;
use crate::broker::{BrokerFuture, BrokerId, Brokerage, BrokerError};
use crate::{
    Bar, BarSeries, Contract, ContractDetails, HistoricalDataRequest, OrderAck, SecType,
    TradeOrder, WhatToShow, FX_EXCHANGE,
};

/// Currencies quoted on the simulated IDEALPRO venue, in market-convention
/// priority: a pair is listed only as `higher.lower`.
const LISTED_CURRENCIES: [&str; 12] = [
    "EUR", "GBP", "AUD", "NZD", "USD", "CAD", "CHF", "NOK", "SEK", "CNH", "HKD", "JPY",
];

const MAX_BARS: i64 = 1_000;

/// Deterministic offline brokerage.
///
/// Resolves IDEALPRO cash pairs quoted in market convention, generates
/// repeatable bars, and acknowledges orders with sequential ids.
#[derive(Debug, Default)]
pub struct SimulatedBrokerage {
    next_order_id: AtomicU64,
}

impl SimulatedBrokerage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, contract: &Contract) -> Result<ContractDetails, BrokerError> {
        let not_found = || {
            BrokerError::not_found(format!(
                "No security definition has been found for the request ({} {} {})",
                contract.symbol, contract.sec_type, contract.currency
            ))
        };

        if contract.sec_type != SecType::Cash || !contract.exchange.eq_ignore_ascii_case(FX_EXCHANGE) {
            return Err(not_found());
        }

        let base = contract.symbol.to_ascii_uppercase();
        let quote = contract.currency.to_ascii_uppercase();
        let (Some(base_rank), Some(quote_rank)) = (rank(&base), rank(&quote)) else {
            return Err(not_found());
        };
        if base_rank >= quote_rank {
            return Err(not_found());
        }

        let local_symbol = format!("{base}.{quote}");
        let resolved = Contract {
            con_id: (pair_seed(&local_symbol) % 90_000_000 + 10_000_000) as i64,
            symbol: base.clone(),
            sec_type: SecType::Cash,
            exchange: FX_EXCHANGE.to_owned(),
            primary_exchange: String::new(),
            currency: quote.clone(),
            local_symbol: local_symbol.clone(),
        };

        Ok(ContractDetails {
            contract: resolved,
            market_name: local_symbol,
            min_tick: if quote == "JPY" { 0.005 } else { 0.00005 },
            long_name: format!("{base} vs {quote}"),
            time_zone_id: String::from("US/Eastern"),
        })
    }

    fn generate(&self, request: &HistoricalDataRequest) -> BarSeries {
        let step = request.bar_size.seconds();
        let count = (request.duration.approx_seconds() / step).min(MAX_BARS);
        let end = request
            .end_date_time
            .instant()
            .unwrap_or_else(OffsetDateTime::now_utc);

        let local_symbol = format!(
            "{}.{}",
            request.contract.symbol.to_ascii_uppercase(),
            request.contract.currency.to_ascii_uppercase()
        );
        let seed = pair_seed(&local_symbol);
        let mut price = 0.5 + (seed % 1_500) as f64 / 1_000.0;
        let skew = quote_skew(request.what_to_show, price);

        let mut bars = Vec::with_capacity(count.max(0) as usize);
        for index in 0..count {
            let Some(ts) = end.checked_sub(Duration::seconds(step * (count - index))) else {
                continue;
            };
            let wave = ((index as f64) * 0.7 + (seed % 7) as f64).sin() * 0.004;
            let open = price + skew;
            let close = price * (1.0 + wave) + skew;
            let spread = price * 0.0015;
            bars.push(Bar::new(
                format_bar_date(ts, request.bar_size),
                round5(open),
                round5(open.max(close) + spread),
                round5(open.min(close) - spread),
                round5(close),
            ));
            price = close - skew;
        }

        debug!(pair = %local_symbol, bars = bars.len(), "generated simulated bars");
        BarSeries::new(request.pair.clone(), request.bar_size, bars)
    }
}

impl Brokerage for SimulatedBrokerage {
    fn id(&self) -> BrokerId {
        BrokerId::Simulated
    }

    fn resolve_contract<'a>(&'a self, contract: &'a Contract) -> BrokerFuture<'a, ContractDetails> {
        Box::pin(async move { self.lookup(contract) })
    }

    fn historical_data<'a>(
        &'a self,
        request: &'a HistoricalDataRequest,
    ) -> BrokerFuture<'a, BarSeries> {
        Box::pin(async move {
            self.lookup(&request.contract)?;
            Ok(self.generate(request))
        })
    }

    fn place_order<'a>(
        &'a self,
        contract: &'a Contract,
        order: &'a TradeOrder,
    ) -> BrokerFuture<'a, OrderAck> {
        Box::pin(async move {
            if contract.symbol.is_empty() || contract.currency.is_empty() {
                return Err(BrokerError::invalid_request(
                    "order contract requires a symbol and a currency",
                ));
            }
            let id = self.next_order_id.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(id, side = %order.side, quantity = order.quantity, "simulated order accepted");
            Ok(OrderAck {
                order_id: id.to_string(),
                status: String::from("Submitted"),
            })
        })
    }
}

fn rank(currency: &str) -> Option<usize> {
    LISTED_CURRENCIES.iter().position(|listed| *listed == currency)
}

fn pair_seed(local_symbol: &str) -> u64 {
    local_symbol.bytes().fold(13_u64, |acc, byte| {
        acc.wrapping_mul(29).wrapping_add(byte as u64)
    })
}

fn quote_skew(what_to_show: WhatToShow, price: f64) -> f64 {
    match what_to_show {
        WhatToShow::Bid => -price * 0.0001,
        WhatToShow::Ask => price * 0.0001,
        _ => 0.0,
    }
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}
