//! Behavior tests for checking resolved contracts against the typed pair.

use fxdash_core::{
    verify_contract, BrokerError, Brokerage, Contract, ContractCheck, CurrencyPair,
    SimulatedBrokerage,
};
use fxdash_tests::details;

#[test]
fn matching_description_lets_the_query_proceed() {
    // Given: the brokerage describes AUD.CAD
    let resolved = Ok(details("AUD.CAD"));

    // When: it is checked against the typed pair
    let check = verify_contract(resolved, "AUD.CAD");

    // Then: the user sees the acknowledgement
    assert!(check.is_matched());
    assert_eq!(
        check.message(),
        "We've found the right contract! Submitted query for AUD.CAD"
    );
}

#[test]
fn description_is_read_from_its_eleventh_field() {
    let details = details("EUR.GBP");
    let delimited = details.to_delimited();

    assert_eq!(delimited.split(',').nth(10), Some("EUR.GBP"));
    assert_eq!(details.pair_field().as_deref(), Some("EUR.GBP"));
}

#[test]
fn different_description_stops_with_both_symbols_named() {
    let check = verify_contract(Ok(details("EUR.USD")), "AUD.CAD");

    assert_eq!(
        check,
        ContractCheck::Rejected(String::from(
            "Contract symbol EUR.USD does not match with the input AUD.CAD"
        ))
    );
}

#[test]
fn resolution_failure_is_echoed_to_the_user() {
    let check = verify_contract(
        Err(BrokerError::unavailable("gateway session expired")),
        "AUD.CAD",
    );

    assert_eq!(
        check.message(),
        "Error: gateway session expired! Please check your input!"
    );
    assert!(!check.is_matched());
}

#[tokio::test]
async fn lowercase_input_is_resolved_but_does_not_match() {
    // Given: the user typed the pair in lowercase
    let broker = SimulatedBrokerage::new();
    let pair = CurrencyPair::parse("eur.usd").expect("well-formed pair");

    // When: the brokerage resolves it
    let resolved = broker.resolve_contract(&Contract::forex(&pair)).await;

    // Then: the canonical symbol differs from the input, so the check fails
    let check = verify_contract(resolved, pair.as_str());
    assert_eq!(
        check.message(),
        "Contract symbol EUR.USD does not match with the input eur.usd"
    );
}

#[tokio::test]
async fn unknown_pair_is_reported_as_not_found() {
    let broker = SimulatedBrokerage::new();
    let pair = CurrencyPair::parse("XXX.YYY").expect("well-formed pair");

    let check = verify_contract(broker.resolve_contract(&Contract::forex(&pair)).await, "XXX.YYY");

    assert!(check.message().starts_with("Error: No security definition"));
}
