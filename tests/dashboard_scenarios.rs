//! End-to-end history and trade scenarios against a scripted brokerage.

use std::sync::Arc;

use fxdash_core::{BrokerError, OrderSide, OrderSubmitter, TradeForm};
use fxdash_tests::{history_form, pipeline, sample_bars, BrokerCall, RecordingBrokerage};

#[tokio::test]
async fn matching_pair_renders_titled_candlestick_chart() {
    // Given: the brokerage resolves AUD.CAD and has five daily bars
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", sample_bars()));

    // When: the user submits the default history form
    let outcome = pipeline(&broker).run(&history_form("AUD.CAD")).await;

    // Then: the acknowledgement and a titled chart with every bar come back
    assert_eq!(
        outcome.message,
        "We've found the right contract! Submitted query for AUD.CAD"
    );
    assert_eq!(outcome.figure.title(), Some("Exchange Rate: AUD.CAD"));
    let trace = &outcome.figure.data[0];
    assert_eq!(trace.x.len(), 5);
    assert_eq!(trace.x[0], "20240102");
    assert_eq!(trace.close[4], 0.9081);

    // And: the history call carried the form's parameters
    let calls = broker.calls();
    assert_eq!(calls.len(), 2);
    let BrokerCall::History(request) = &calls[1] else {
        panic!("second call should be the history fetch, got {:?}", calls[1]);
    };
    assert_eq!(request.end_date_time_str(), "");
    assert_eq!(request.duration_str(), "20 D");
    assert_eq!(request.bar_size.as_str(), "1 day");
    assert_eq!(request.what_to_show.as_str(), "MIDPOINT");
    assert_eq!(request.use_rth.as_str(), "1");
    assert_eq!(request.contract.con_id, 15016241, "history uses the resolved contract");
}

#[tokio::test]
async fn mismatched_pair_never_fetches_history() {
    // Given: the brokerage resolves the input to a different pair
    let broker = Arc::new(RecordingBrokerage::resolving_to("EUR.USD", sample_bars()));

    // When: the user submits AUD.CAD
    let outcome = pipeline(&broker).run(&history_form("AUD.CAD")).await;

    // Then: the mismatch is reported, the chart is blank, and no bars were requested
    assert_eq!(
        outcome.message,
        "Contract symbol EUR.USD does not match with the input AUD.CAD"
    );
    assert!(outcome.figure.is_empty());
    assert_eq!(broker.history_calls(), 0);
}

#[tokio::test]
async fn padded_input_is_compared_as_typed() {
    // Given: the user typed the pair with surrounding spaces
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", sample_bars()));

    // When: it is submitted
    let outcome = pipeline(&broker).run(&history_form(" AUD.CAD ")).await;

    // Then: the resolved symbol is compared with the exact text, which differs
    assert_eq!(
        outcome.message,
        "Contract symbol AUD.CAD does not match with the input  AUD.CAD "
    );
    assert!(outcome.figure.is_empty());
    assert_eq!(broker.history_calls(), 0);
}

#[tokio::test]
async fn failed_resolution_never_fetches_history() {
    let broker = Arc::new(RecordingBrokerage::failing_resolution(BrokerError::not_found(
        "No security definition has been found for the request",
    )));

    let outcome = pipeline(&broker).run(&history_form("XXX.YYY")).await;

    assert_eq!(
        outcome.message,
        "Error: No security definition has been found for the request! Please check your input!"
    );
    assert!(outcome.figure.is_empty());
    assert_eq!(broker.history_calls(), 0);
}

#[tokio::test]
async fn malformed_pair_reaches_no_brokerage_capability() {
    // Given: a pair without a separator
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", sample_bars()));

    // When: it is submitted
    let outcome = pipeline(&broker).run(&history_form("AUDCAD")).await;

    // Then: the user is told to check the input and nothing was called
    assert!(outcome.message.starts_with("Error: "));
    assert!(outcome.message.ends_with("! Please check your input!"));
    assert!(outcome.figure.is_empty());
    assert!(broker.calls().is_empty());
}

#[tokio::test]
async fn history_failure_after_match_is_reported_with_blank_chart() {
    let broker = Arc::new(RecordingBrokerage::failing_history(
        "AUD.CAD",
        BrokerError::unavailable("HMDS query returned no data"),
    ));

    let outcome = pipeline(&broker).run(&history_form("AUD.CAD")).await;

    assert_eq!(
        outcome.message,
        "Historical data request failed: HMDS query returned no data"
    );
    assert!(outcome.figure.is_empty());
    assert_eq!(broker.history_calls(), 1);
}

#[tokio::test]
async fn empty_history_still_renders_titled_chart() {
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", Vec::new()));

    let outcome = pipeline(&broker).run(&history_form("AUD.CAD")).await;

    assert_eq!(outcome.figure.title(), Some("Exchange Rate: AUD.CAD"));
    assert!(outcome.figure.data[0].x.is_empty());
}

#[tokio::test]
async fn trade_click_confirms_order_without_transmitting() {
    // Given: the default trade form and a confirm-only submitter
    let form = TradeForm::default();

    // When: the user clicks trade
    let outcome = OrderSubmitter::confirm_only()
        .submit(&form)
        .await
        .expect("default form is valid");

    // Then: the confirmation reads action, amount, pair
    assert_eq!(outcome.message, "BUY 20000 AUDCAD");
    assert_eq!(outcome.order.side, OrderSide::Buy);
    assert_eq!(outcome.order.quantity, 20_000);
    assert!(outcome.ack.is_none());
}

#[tokio::test]
async fn transmission_is_opt_in_and_reports_the_acknowledgement() {
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", Vec::new()));
    let form = TradeForm {
        side: String::from("SELL"),
        trade_amt: String::from("15000"),
        ..TradeForm::default()
    };

    let outcome = OrderSubmitter::transmitting(broker.clone())
        .submit(&form)
        .await
        .expect("valid form");

    assert_eq!(outcome.message, "SELL 15000 AUDCAD (order 42 Submitted)");
    let calls = broker.calls();
    let [BrokerCall::Order(contract, order)] = calls.as_slice() else {
        panic!("exactly one order should be sent, got {calls:?}");
    };
    assert_eq!(
        (contract.symbol.as_str(), contract.currency.as_str()),
        ("AUD", "CAD")
    );
    assert_eq!(order.currency_pair, "AUDCAD");
}

#[tokio::test]
async fn contract_naming_another_pair_is_never_transmitted() {
    // Given: the contract inputs describe AUD/USD while the trade names AUDCAD
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", Vec::new()));
    let form = TradeForm {
        currency: String::from("USD"),
        ..TradeForm::default()
    };

    // When: the user clicks trade with transmission enabled
    let result = OrderSubmitter::transmitting(broker.clone()).submit(&form).await;

    // Then: the form is rejected and nothing reaches the brokerage
    let error = result.expect_err("mismatched contract");
    assert_eq!(
        error.to_string(),
        "contract AUDUSD does not match trade currency AUDCAD"
    );
    assert_eq!(broker.order_calls(), 0);
}

#[tokio::test]
async fn invalid_trade_form_transmits_nothing() {
    let broker = Arc::new(RecordingBrokerage::resolving_to("AUD.CAD", Vec::new()));
    let form = TradeForm {
        order_type: String::from("LMT"),
        lmt_price: None,
        ..TradeForm::default()
    };

    let result = OrderSubmitter::transmitting(broker.clone()).submit(&form).await;

    assert!(result.is_err());
    assert_eq!(broker.order_calls(), 0);
}
