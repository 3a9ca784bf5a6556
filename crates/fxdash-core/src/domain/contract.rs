use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::CurrencyPair;

/// Exchange used for every FX contract.
pub const FX_EXCHANGE: &str = "IDEALPRO";

/// Offset of the local-symbol field in the comma-delimited description.
pub const PAIR_FIELD_INDEX: usize = 10;

/// Security type of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecType {
    Cash,
    Stk,
    Fut,
    Opt,
}

impl SecType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Stk => "STK",
            Self::Fut => "FUT",
            Self::Opt => "OPT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASH" => Some(Self::Cash),
            "STK" => Some(Self::Stk),
            "FUT" => Some(Self::Fut),
            "OPT" => Some(Self::Opt),
            _ => None,
        }
    }
}

impl Display for SecType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument identifier submitted for resolution and trading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub con_id: i64,
    pub symbol: String,
    pub sec_type: SecType,
    pub exchange: String,
    pub primary_exchange: String,
    pub currency: String,
    pub local_symbol: String,
}

impl Contract {
    /// IDEALPRO cash contract for a pair: symbol is the base, currency the quote.
    pub fn forex(pair: &CurrencyPair) -> Self {
        Self {
            con_id: 0,
            symbol: pair.base().to_owned(),
            sec_type: SecType::Cash,
            exchange: FX_EXCHANGE.to_owned(),
            primary_exchange: String::new(),
            currency: pair.quote().to_owned(),
            local_symbol: String::new(),
        }
    }
}

/// Brokerage description of a resolved contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDetails {
    pub contract: Contract,
    pub market_name: String,
    pub min_tick: f64,
    pub long_name: String,
    pub time_zone_id: String,
}

impl ContractDetails {
    /// Comma-delimited form, contract fields first.
    pub fn to_delimited(&self) -> String {
        let c = &self.contract;
        [
            c.con_id.to_string(),
            c.symbol.clone(),
            c.sec_type.to_string(),
            String::new(),
            String::from("0"),
            String::new(),
            String::new(),
            c.exchange.clone(),
            c.primary_exchange.clone(),
            c.currency.clone(),
            c.local_symbol.clone(),
            self.market_name.clone(),
            String::from("False"),
            self.min_tick.to_string(),
            self.long_name.clone(),
            self.time_zone_id.clone(),
        ]
        .join(",")
    }

    /// The currency-pair field, read positionally from [`Self::to_delimited`].
    pub fn pair_field(&self) -> Option<String> {
        self.to_delimited()
            .split(',')
            .nth(PAIR_FIELD_INDEX)
            .map(str::to_owned)
    }
}

impl Display for ContractDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_delimited())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(local_symbol: &str) -> ContractDetails {
        let pair = CurrencyPair::parse("AUD.CAD").expect("valid pair");
        let mut contract = Contract::forex(&pair);
        contract.con_id = 15016241;
        contract.local_symbol = local_symbol.to_owned();
        ContractDetails {
            contract,
            market_name: String::from("AUD.CAD"),
            min_tick: 0.00005,
            long_name: String::from("Australian dollar"),
            time_zone_id: String::from("US/Eastern"),
        }
    }

    #[test]
    fn forex_contract_uses_idealpro_cash() {
        let pair = CurrencyPair::parse("EUR.USD").expect("valid pair");
        let contract = Contract::forex(&pair);
        assert_eq!(contract.symbol, "EUR");
        assert_eq!(contract.currency, "USD");
        assert_eq!(contract.sec_type, SecType::Cash);
        assert_eq!(contract.exchange, "IDEALPRO");
    }

    #[test]
    fn eleventh_field_is_local_symbol() {
        let details = details("AUD.CAD");
        let fields: Vec<String> = details.to_delimited().split(',').map(str::to_owned).collect();
        assert_eq!(fields[1], "AUD");
        assert_eq!(fields[PAIR_FIELD_INDEX], "AUD.CAD");
        assert_eq!(details.pair_field().as_deref(), Some("AUD.CAD"));
    }
}
