use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use super::format_bar_date;
use crate::broker::{BrokerFuture, BrokerId, Brokerage, BrokerError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{
    Bar, BarSeries, BarSize, Contract, ContractDetails, DurationSpec, DurationUnit,
    HistoricalDataRequest, OrderAck, OrderType, SecType, TradeOrder, WhatToShow,
};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Candidates inspected per contract search.
const MAX_SEARCH_CANDIDATES: usize = 5;

/// Connection settings for an IBKR Client Portal gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPortalConfig {
    /// Gateway API root, e.g. `https://localhost:5000/v1/api`.
    pub base_url: String,
    /// Account used for order transmission.
    pub account_id: Option<String>,
    pub timeout_ms: u64,
    /// Gateway pacing limit.
    pub requests_per_second: u32,
}

impl Default for ClientPortalConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://localhost:5000/v1/api"),
            account_id: None,
            timeout_ms: 10_000,
            requests_per_second: 10,
        }
    }
}

/// Brokerage backed by the IBKR Client Portal Web API.
///
/// The gateway session must already be authenticated (browser login); the
/// session cookie is kept by the HTTP client.
#[derive(Clone)]
pub struct ClientPortalBrokerage {
    http_client: Arc<dyn HttpClient>,
    config: ClientPortalConfig,
    limiter: Arc<DirectRateLimiter>,
}

impl ClientPortalBrokerage {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ClientPortalConfig) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            http_client,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
            config: ClientPortalConfig {
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                ..config
            },
        }
    }

    pub fn config(&self) -> &ClientPortalConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BrokerError> {
        self.limiter.until_ready().await;
        let request = request.with_timeout_ms(self.config.timeout_ms);
        debug!(url = %request.url, "client portal request");

        let response = self.http_client.execute(request).await.map_err(|error| {
            let reason = if error.is_timeout() {
                "request timed out"
            } else {
                "transport error"
            };
            BrokerError::unavailable(format!("client portal {reason}: {}", error.message()))
        })?;
        if response.is_success() {
            return Ok(response);
        }

        match response.status {
            401 => Err(BrokerError::unavailable(
                "client portal session is not authenticated",
            )),
            404 => Err(BrokerError::not_found(gateway_error(&response))),
            status if (400..500).contains(&status) => {
                Err(BrokerError::rejected(gateway_error(&response)))
            }
            status => Err(BrokerError::unavailable(format!(
                "client portal returned status {status}"
            ))),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BrokerError> {
        let response = self.send(HttpRequest::get(self.url(path))).await?;
        parse_body(&response)
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, BrokerError> {
        let request = HttpRequest::post(self.url(path)).with_json_body(body.to_string());
        let response = self.send(request).await?;
        parse_body(&response)
    }

    async fn resolve(&self, contract: &Contract) -> Result<ContractDetails, BrokerError> {
        let not_found = || {
            BrokerError::not_found(format!(
                "No security definition has been found for the request ({} {} {})",
                contract.symbol, contract.sec_type, contract.currency
            ))
        };

        let candidates: Vec<SearchResult> = self
            .post_json(
                "/iserver/secdef/search",
                json!({ "symbol": contract.symbol, "secType": contract.sec_type.as_str() }),
            )
            .await?;

        let conids = candidates
            .iter()
            .filter(|candidate| candidate.lists(contract.sec_type))
            .filter_map(SearchResult::conid)
            .take(MAX_SEARCH_CANDIDATES);

        for conid in conids {
            let info: ContractInfo = self
                .get_json(&format!("/iserver/contract/{conid}/info"))
                .await?;
            if info.currency.eq_ignore_ascii_case(&contract.currency) {
                return Ok(info.into_details(conid, contract));
            }
        }

        Err(not_found())
    }

    /// Gateway id of `contract`; searches only when it was not resolved yet.
    async fn conid(&self, contract: &Contract) -> Result<i64, BrokerError> {
        if contract.con_id > 0 {
            return Ok(contract.con_id);
        }
        Ok(self.resolve(contract).await?.contract.con_id)
    }
}

impl Brokerage for ClientPortalBrokerage {
    fn id(&self) -> BrokerId {
        BrokerId::ClientPortal
    }

    fn resolve_contract<'a>(&'a self, contract: &'a Contract) -> BrokerFuture<'a, ContractDetails> {
        Box::pin(self.resolve(contract))
    }

    fn historical_data<'a>(
        &'a self,
        request: &'a HistoricalDataRequest,
    ) -> BrokerFuture<'a, BarSeries> {
        Box::pin(async move {
            let bar = gateway_bar(request.bar_size)?;
            let source = gateway_source(request.what_to_show)?;
            let conid = self.conid(&request.contract).await?;

            let mut query = format!(
                "/iserver/marketdata/history?conid={conid}&exchange={}&period={}&bar={bar}&outsideRth={}&source={source}",
                urlencoding::encode(&request.contract.exchange),
                gateway_period(request.duration),
                !request.use_rth.regular_hours_only(),
            );
            if let Some(end) = request.end_date_time.instant() {
                query.push_str("&startTime=");
                query.push_str(&urlencoding::encode(&gateway_time(end)));
            }

            let history: HistoryPayload = self.get_json(&query).await?;
            let bars = history
                .data
                .into_iter()
                .map(|point| point.into_bar(request.bar_size))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(BarSeries::new(request.pair.clone(), request.bar_size, bars))
        })
    }

    fn place_order<'a>(
        &'a self,
        contract: &'a Contract,
        order: &'a TradeOrder,
    ) -> BrokerFuture<'a, OrderAck> {
        Box::pin(async move {
            let account = self.config.account_id.as_deref().ok_or_else(|| {
                BrokerError::invalid_request("no brokerage account is configured for orders")
            })?;
            let conid = self.conid(contract).await?;

            let mut ticket = json!({
                "acctId": account,
                "conid": conid,
                "cOID": uuid::Uuid::new_v4().to_string(),
                "orderType": order.order_type.as_str(),
                "side": order.side.as_str(),
                "quantity": order.quantity,
                "listingExchange": contract.exchange,
                "tif": "DAY",
            });
            if let (OrderType::Lmt, Some(price)) = (order.order_type, order.limit_price) {
                ticket["price"] = json!(price);
            }

            let replies: Vec<OrderReply> = self
                .post_json(
                    &format!("/iserver/account/{}/orders", urlencoding::encode(account)),
                    json!({ "orders": [ticket] }),
                )
                .await?;

            let reply = replies
                .into_iter()
                .next()
                .ok_or_else(|| BrokerError::internal("client portal returned an empty order reply"))?;
            reply.into_ack()
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    conid: Value,
    #[serde(default)]
    sections: Vec<SearchSection>,
}

impl SearchResult {
    fn conid(&self) -> Option<i64> {
        value_as_i64(&self.conid).filter(|conid| *conid > 0)
    }

    fn lists(&self, sec_type: SecType) -> bool {
        self.sections.is_empty()
            || self
                .sections
                .iter()
                .any(|section| section.sec_type.eq_ignore_ascii_case(sec_type.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchSection {
    #[serde(rename = "secType", default)]
    sec_type: String,
}

#[derive(Debug, Deserialize)]
struct ContractInfo {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    exchange: String,
    #[serde(default)]
    local_symbol: String,
    #[serde(default)]
    company_name: String,
}

impl ContractInfo {
    fn into_details(self, conid: i64, requested: &Contract) -> ContractDetails {
        let exchange = if self.exchange.is_empty() {
            requested.exchange.clone()
        } else {
            self.exchange
        };
        ContractDetails {
            contract: Contract {
                con_id: conid,
                symbol: self.symbol,
                sec_type: requested.sec_type,
                exchange,
                primary_exchange: requested.primary_exchange.clone(),
                currency: self.currency,
                local_symbol: self.local_symbol.clone(),
            },
            market_name: self.local_symbol,
            min_tick: 0.0,
            long_name: self.company_name,
            time_zone_id: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryPayload {
    #[serde(default)]
    data: Vec<HistoryPoint>,
}

#[derive(Debug, Deserialize)]
struct HistoryPoint {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    #[serde(default)]
    v: Option<f64>,
}

impl HistoryPoint {
    fn into_bar(self, bar_size: BarSize) -> Result<Bar, BrokerError> {
        let ts = OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.t) * 1_000_000)
            .map_err(|_| BrokerError::internal(format!("invalid bar timestamp {}", self.t)))?;
        let bar = Bar::new(format_bar_date(ts, bar_size), self.o, self.h, self.l, self.c);
        Ok(match self.v {
            Some(volume) => bar.with_volume(volume),
            None => bar,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OrderReply {
    #[serde(default)]
    order_id: Value,
    #[serde(default)]
    order_status: Option<String>,
    #[serde(default)]
    message: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

impl OrderReply {
    fn into_ack(self) -> Result<OrderAck, BrokerError> {
        if let Some(error) = self.error {
            return Err(BrokerError::rejected(error));
        }

        let order_id = match &self.order_id {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        };

        match order_id {
            Some(order_id) => Ok(OrderAck {
                order_id,
                status: self.order_status.unwrap_or_else(|| String::from("Submitted")),
            }),
            // A reply prompt must be confirmed in the gateway before the order is live.
            None if !self.message.is_empty() => Err(BrokerError::rejected(format!(
                "order needs confirmation: {}",
                self.message.join(" ")
            ))),
            None => Err(BrokerError::internal("client portal order reply has no order id")),
        }
    }
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, BrokerError> {
    serde_json::from_str(&response.body).map_err(|error| {
        BrokerError::internal(format!("client portal response parse error: {error}"))
    })
}

fn gateway_error(response: &HttpResponse) -> String {
    serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| format!("client portal returned status {}", response.status))
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// `20 D` becomes `20d`; second durations are rounded up to whole minutes.
fn gateway_period(duration: DurationSpec) -> String {
    match duration.unit {
        DurationUnit::Seconds => format!("{}min", duration.quantity.div_ceil(60).max(1)),
        DurationUnit::Days => format!("{}d", duration.quantity),
        DurationUnit::Weeks => format!("{}w", duration.quantity),
        DurationUnit::Months => format!("{}m", duration.quantity),
        DurationUnit::Years => format!("{}y", duration.quantity),
    }
}

fn gateway_bar(bar_size: BarSize) -> Result<&'static str, BrokerError> {
    match bar_size {
        BarSize::OneMinute => Ok("1min"),
        BarSize::TwoMinutes => Ok("2min"),
        BarSize::ThreeMinutes => Ok("3min"),
        BarSize::FiveMinutes => Ok("5min"),
        BarSize::FifteenMinutes => Ok("15min"),
        BarSize::ThirtyMinutes => Ok("30min"),
        BarSize::OneHour => Ok("1h"),
        BarSize::OneDay => Ok("1d"),
        other => Err(BrokerError::invalid_request(format!(
            "bar size '{other}' is not available from the Client Portal gateway"
        ))),
    }
}

fn gateway_source(what_to_show: WhatToShow) -> Result<&'static str, BrokerError> {
    match what_to_show {
        WhatToShow::Trades => Ok("Trades"),
        WhatToShow::Midpoint => Ok("Midpoint"),
        WhatToShow::Bid => Ok("Bid"),
        WhatToShow::Ask => Ok("Ask"),
        WhatToShow::BidAsk => Ok("Bid_Ask"),
        other => Err(BrokerError::invalid_request(format!(
            "whatToShow '{other}' is not available from the Client Portal gateway"
        ))),
    }
}

/// Gateway timestamps are UTC `YYYYMMDD-HH:MM:SS`.
fn gateway_time(instant: OffsetDateTime) -> String {
    instant
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year][month][day]-[hour]:[minute]:[second]"
        ))
        .unwrap_or_default()
}
