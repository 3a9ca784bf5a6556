//! Trade section handler.
//!
//! Formats the confirmation line and builds a [`TradeOrder`]. Transmission to
//! the brokerage is opt-in: an [`OrderSubmitter`] built with
//! [`OrderSubmitter::confirm_only`] never calls [`Brokerage::place_order`].

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    Brokerage, Contract, OrderAck, OrderSide, OrderType, SecType, TradeOrder, ValidationError,
    FX_EXCHANGE,
};

/// Raw field values of the trade form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeForm {
    pub side: String,
    pub trade_currency: String,
    pub trade_amt: String,
    pub order_type: String,
    pub lmt_price: Option<f64>,
    pub contract_symbol: String,
    pub sec_type: String,
    pub currency: String,
    pub exchange: Option<String>,
    pub primary_exchange: Option<String>,
}

impl Default for TradeForm {
    fn default() -> Self {
        Self {
            side: OrderSide::Buy.as_str().to_owned(),
            trade_currency: String::from("AUDCAD"),
            trade_amt: String::from("20000"),
            order_type: OrderType::Mkt.as_str().to_owned(),
            lmt_price: None,
            contract_symbol: String::from("AUD"),
            sec_type: SecType::Cash.as_str().to_owned(),
            currency: String::from("CAD"),
            exchange: None,
            primary_exchange: None,
        }
    }
}

impl TradeOrder {
    pub fn from_form(form: &TradeForm) -> Result<Self, ValidationError> {
        let side = OrderSide::from_str(&form.side)?;
        let order_type = OrderType::from_str(&form.order_type)?;

        let currency_pair = form.trade_currency.trim();
        if currency_pair.is_empty() {
            return Err(ValidationError::EmptyTradeCurrency);
        }

        let quantity = form
            .trade_amt
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| ValidationError::InvalidTradeAmount {
                value: form.trade_amt.clone(),
            })?;

        let limit_price = match order_type {
            OrderType::Mkt => None,
            OrderType::Lmt => Some(
                form.lmt_price
                    .filter(|price| price.is_finite() && *price > 0.0)
                    .ok_or(ValidationError::MissingLimitPrice)?,
            ),
        };

        Ok(Self {
            side,
            currency_pair: currency_pair.to_owned(),
            quantity,
            order_type,
            limit_price,
        })
    }

    /// `"{side} {amount} {pair}"`, e.g. `BUY 20000 AUDCAD`.
    pub fn confirmation(&self) -> String {
        format!("{} {} {}", self.side, self.quantity, self.currency_pair)
    }
}

/// Contract described by the trade form's contract inputs.
pub fn contract_from_form(form: &TradeForm) -> Result<Contract, ValidationError> {
    let sec_type = SecType::parse(&form.sec_type).ok_or_else(|| ValidationError::InvalidSecType {
        value: form.sec_type.clone(),
    })?;

    let exchange = form
        .exchange
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| match sec_type {
            SecType::Cash => FX_EXCHANGE.to_owned(),
            _ => String::from("SMART"),
        });

    Ok(Contract {
        con_id: 0,
        symbol: form.contract_symbol.trim().to_owned(),
        sec_type,
        exchange,
        primary_exchange: form
            .primary_exchange
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned(),
        currency: form.currency.trim().to_owned(),
        local_symbol: String::new(),
    })
}

/// The contract sent to the brokerage must be the instrument the
/// confirmation names: `symbol + currency` for cash pairs, the symbol
/// otherwise. Case and a `.` separator are ignored.
fn check_instrument(contract: &Contract, order: &TradeOrder) -> Result<(), ValidationError> {
    let named = order.currency_pair.replace('.', "").to_ascii_uppercase();
    let contract_name = match contract.sec_type {
        SecType::Cash => format!("{}{}", contract.symbol, contract.currency),
        _ => contract.symbol.clone(),
    };

    if contract_name.to_ascii_uppercase() == named {
        Ok(())
    } else {
        Err(ValidationError::InstrumentMismatch {
            contract: contract_name,
            trade_currency: order.currency_pair.clone(),
        })
    }
}

/// What the trade section renders after a click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub message: String,
    pub order: TradeOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<OrderAck>,
}

/// Handles trade clicks; holds a brokerage only when transmission is enabled.
#[derive(Clone, Default)]
pub struct OrderSubmitter {
    transmit_to: Option<Arc<dyn Brokerage>>,
}

impl OrderSubmitter {
    /// Builds orders and confirmation messages without transmitting anything.
    pub fn confirm_only() -> Self {
        Self { transmit_to: None }
    }

    /// Also transmits every built order through `broker`.
    pub fn transmitting(broker: Arc<dyn Brokerage>) -> Self {
        Self {
            transmit_to: Some(broker),
        }
    }

    pub fn transmits(&self) -> bool {
        self.transmit_to.is_some()
    }

    #[instrument(skip_all, fields(side = %form.side, pair = %form.trade_currency))]
    pub async fn submit(&self, form: &TradeForm) -> Result<TradeOutcome, ValidationError> {
        let order = TradeOrder::from_form(form)?;
        let mut message = order.confirmation();
        info!(quantity = order.quantity, order_type = %order.order_type, "order built");

        let Some(broker) = &self.transmit_to else {
            return Ok(TradeOutcome {
                message,
                order,
                ack: None,
            });
        };

        let contract = contract_from_form(form)?;
        check_instrument(&contract, &order)?;
        let ack = match broker.place_order(&contract, &order).await {
            Ok(ack) => {
                info!(order_id = %ack.order_id, status = %ack.status, "order transmitted");
                message.push_str(&format!(" (order {} {})", ack.order_id, ack.status));
                Some(ack)
            }
            Err(error) => {
                warn!(code = error.code(), "order transmission failed");
                message.push_str(&format!(" (not transmitted: {})", error.message()));
                None
            }
        };

        Ok(TradeOutcome {
            message,
            order,
            ack,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_confirms_buy_line() {
        let order = TradeOrder::from_form(&TradeForm::default()).expect("valid");
        assert_eq!(order.confirmation(), "BUY 20000 AUDCAD");
        assert_eq!(order.limit_price, None);
    }

    #[test]
    fn limit_order_requires_price() {
        let form = TradeForm {
            order_type: String::from("LMT"),
            ..TradeForm::default()
        };
        assert_eq!(
            TradeOrder::from_form(&form).expect_err("must fail"),
            ValidationError::MissingLimitPrice
        );

        let priced = TradeForm {
            lmt_price: Some(0.915),
            ..form
        };
        let order = TradeOrder::from_form(&priced).expect("valid");
        assert_eq!(order.limit_price, Some(0.915));
    }

    #[test]
    fn rejects_bad_side_and_amount() {
        let bad_side = TradeForm {
            side: String::from("HOLD"),
            ..TradeForm::default()
        };
        assert!(matches!(
            TradeOrder::from_form(&bad_side),
            Err(ValidationError::InvalidOrderSide { .. })
        ));

        for amount in ["0", "-5", "1e3", ""] {
            let form = TradeForm {
                trade_amt: amount.to_owned(),
                ..TradeForm::default()
            };
            assert!(
                matches!(
                    TradeOrder::from_form(&form),
                    Err(ValidationError::InvalidTradeAmount { .. })
                ),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn cash_contract_defaults_to_idealpro() {
        let contract = contract_from_form(&TradeForm::default()).expect("valid");
        assert_eq!(contract.symbol, "AUD");
        assert_eq!(contract.currency, "CAD");
        assert_eq!(contract.exchange, "IDEALPRO");
        assert_eq!(contract.sec_type, SecType::Cash);
    }

    #[test]
    fn contract_must_name_the_traded_pair() {
        let order = TradeOrder::from_form(&TradeForm::default()).expect("valid");
        let matching = contract_from_form(&TradeForm::default()).expect("valid");
        assert_eq!(check_instrument(&matching, &order), Ok(()));

        let dotted = TradeOrder {
            currency_pair: String::from("aud.cad"),
            ..order.clone()
        };
        assert_eq!(check_instrument(&matching, &dotted), Ok(()));

        let other = contract_from_form(&TradeForm {
            currency: String::from("USD"),
            ..TradeForm::default()
        })
        .expect("valid");
        assert_eq!(
            check_instrument(&other, &order),
            Err(ValidationError::InstrumentMismatch {
                contract: String::from("AUDUSD"),
                trade_currency: String::from("AUDCAD"),
            })
        );
    }

    #[tokio::test]
    async fn confirm_only_never_transmits() {
        let submitter = OrderSubmitter::confirm_only();
        assert!(!submitter.transmits());

        let outcome = submitter.submit(&TradeForm::default()).await.expect("valid");
        assert_eq!(outcome.message, "BUY 20000 AUDCAD");
        assert!(outcome.ack.is_none());
    }
}
