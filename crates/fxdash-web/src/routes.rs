//! HTTP surface of the dashboard.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Dashboard page |
//! | `GET /api/options` | Dropdown choices and form defaults |
//! | `POST /api/history` | History form submit |
//! | `POST /api/trade` | Trade button click |
//! | `GET /health` | Liveness probe |
//!
//! Form problems, including bodies that do not decode, are reported in the
//! response message with status 200 so the page can render them in place.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use fxdash_core::{
    BarSize, CandlestickFigure, DurationUnit, HistoryForm, HistoryOutcome, OrderAck, OrderSide,
    OrderType, TradeForm, TradeOrder, UseRth, WhatToShow,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/options", get(options))
        .route("/api/history", post(history))
        .route("/api/trade", post(trade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    broker: String,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        broker: state.broker_id().to_string(),
    })
}

#[derive(Debug, Serialize)]
struct Options {
    what_to_show: Vec<&'static str>,
    bar_sizes: Vec<&'static str>,
    use_rth: Vec<&'static str>,
    duration_units: Vec<&'static str>,
    order_sides: Vec<&'static str>,
    order_types: Vec<&'static str>,
    transmits_orders: bool,
    history_defaults: HistoryForm,
    trade_defaults: TradeForm,
}

async fn options(State(state): State<AppState>) -> Json<Options> {
    Json(Options {
        what_to_show: WhatToShow::ALL.iter().map(|value| value.as_str()).collect(),
        bar_sizes: BarSize::ALL.iter().map(|value| value.as_str()).collect(),
        use_rth: UseRth::ALL.iter().map(|value| value.as_str()).collect(),
        duration_units: DurationUnit::ALL.iter().map(|value| value.code()).collect(),
        order_sides: OrderSide::ALL.iter().map(|value| value.as_str()).collect(),
        order_types: OrderType::ALL.iter().map(|value| value.as_str()).collect(),
        transmits_orders: state.orders().transmits(),
        history_defaults: HistoryForm::default(),
        trade_defaults: TradeForm::default(),
    })
}

fn check_input_message(error: impl std::fmt::Display) -> String {
    format!("Error: {error}! Please check your input!")
}

fn decode_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body).map_err(|error| {
        warn!(%error, "form body rejected");
        check_input_message(error)
    })
}

async fn history(State(state): State<AppState>, body: Bytes) -> Json<HistoryOutcome> {
    let outcome = match decode_form::<HistoryForm>(&body) {
        Ok(form) => state.history().run(&form).await,
        Err(message) => HistoryOutcome {
            message,
            figure: CandlestickFigure::empty(),
        },
    };
    Json(outcome)
}

#[derive(Debug, Serialize)]
struct TradeResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<TradeOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ack: Option<OrderAck>,
}

impl TradeResponse {
    fn rejected(message: String) -> Self {
        Self {
            message,
            order: None,
            ack: None,
        }
    }
}

async fn trade(State(state): State<AppState>, body: Bytes) -> Json<TradeResponse> {
    let form = match decode_form::<TradeForm>(&body) {
        Ok(form) => form,
        Err(message) => return Json(TradeResponse::rejected(message)),
    };

    let response = match state.orders().submit(&form).await {
        Ok(outcome) => TradeResponse {
            message: outcome.message,
            order: Some(outcome.order),
            ack: outcome.ack,
        },
        Err(error) => {
            warn!(%error, "trade form rejected");
            TradeResponse::rejected(check_input_message(error))
        }
    };
    Json(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use fxdash_core::SimulatedBrokerage;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        router(AppState::new(Arc::new(SimulatedBrokerage::new()), false))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        let response = app().oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn index_serves_dashboard_page() {
        let request = Request::builder().uri("/").body(Body::empty()).expect("request builds");
        let response = app().oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let page = String::from_utf8(bytes.to_vec()).expect("utf-8 page");
        assert!(page.contains("id=\"currency-input\""));
        assert!(page.contains("id=\"trade-button\""));
    }

    #[tokio::test]
    async fn options_list_dropdown_choices() {
        let request = Request::builder()
            .uri("/api/options")
            .body(Body::empty())
            .expect("request builds");
        let response = app().oneshot(request).await.expect("router responds");
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let options: Value = serde_json::from_slice(&bytes).expect("json body");

        assert_eq!(options["bar_sizes"].as_array().map(Vec::len), Some(12));
        assert_eq!(options["what_to_show"][0], "TRADES");
        assert_eq!(options["history_defaults"]["currency"], "AUD.CAD");
        assert_eq!(options["transmits_orders"], false);
    }

    #[tokio::test]
    async fn history_with_defaults_returns_titled_figure() {
        let (status, body) = post_json("/api/history", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "We've found the right contract! Submitted query for AUD.CAD"
        );
        assert_eq!(body["figure"]["layout"]["title"]["text"], "Exchange Rate: AUD.CAD");
        assert_eq!(body["figure"]["data"][0]["type"], "candlestick");
    }

    #[tokio::test]
    async fn trade_validation_error_is_reported_in_message() {
        let (status, body) = post_json("/api/trade", json!({ "trade_amt": "lots" })).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Error: ")));
        assert!(body.get("order").is_none());
    }

    #[tokio::test]
    async fn undecodable_bodies_are_reported_in_message() {
        let (status, body) = post_json("/api/history", json!({ "edt_hour": 300 })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Error: ")
                && message.ends_with("! Please check your input!")));
        assert_eq!(body["figure"], json!({ "data": [], "layout": {} }));

        let (status, body) = post_json("/api/trade", json!({ "trade_amt": 20000 })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Error: ")));
        assert!(body.get("order").is_none());
    }

    #[tokio::test]
    async fn trade_confirms_without_transmitting() {
        let (_, body) = post_json("/api/trade", json!({})).await;

        assert_eq!(body["message"], "BUY 20000 AUDCAD");
        assert_eq!(body["order"]["quantity"], 20000);
        assert!(body.get("ack").is_none());
    }
}
