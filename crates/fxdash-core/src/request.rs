//! Historical-data request building.
//!
//! [`HistoryForm`] is the raw snapshot of the history section of the page;
//! [`HistoricalDataRequest::from_form`] turns it into a typed request without
//! performing any I/O.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    BarSize, Contract, CurrencyPair, DurationSpec, EndDateTime, UseRth, ValidationError,
    WhatToShow,
};

/// Raw field values of the history form, read at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryForm {
    pub currency: String,
    pub what_to_show: String,
    pub bar_size: String,
    pub use_rth: String,
    pub edt_date: Option<String>,
    pub edt_hour: Option<u8>,
    pub edt_minute: Option<u8>,
    pub edt_second: Option<u8>,
    pub duration_number: String,
    pub duration_unit: String,
}

impl Default for HistoryForm {
    fn default() -> Self {
        Self {
            currency: String::from("AUD.CAD"),
            what_to_show: WhatToShow::Midpoint.as_str().to_owned(),
            bar_size: BarSize::OneDay.as_str().to_owned(),
            use_rth: UseRth::RegularHoursOnly.as_str().to_owned(),
            edt_date: None,
            edt_hour: None,
            edt_minute: None,
            edt_second: None,
            duration_number: String::from("20"),
            duration_unit: String::from("D"),
        }
    }
}

/// Validated parameters for one historical-data call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalDataRequest {
    pub pair: CurrencyPair,
    pub contract: Contract,
    pub end_date_time: EndDateTime,
    pub duration: DurationSpec,
    pub bar_size: BarSize,
    pub what_to_show: WhatToShow,
    pub use_rth: UseRth,
}

impl HistoricalDataRequest {
    pub fn from_form(form: &HistoryForm) -> Result<Self, ValidationError> {
        let pair = CurrencyPair::parse(&form.currency)?;
        let end_date_time = EndDateTime::from_parts(
            form.edt_date.as_deref(),
            form.edt_hour,
            form.edt_minute,
            form.edt_second,
        )?;

        Ok(Self {
            contract: Contract::forex(&pair),
            pair,
            end_date_time,
            duration: DurationSpec::from_parts(&form.duration_number, &form.duration_unit)?,
            bar_size: BarSize::from_str(&form.bar_size)?,
            what_to_show: WhatToShow::from_str(&form.what_to_show)?,
            use_rth: UseRth::from_str(&form.use_rth)?,
        })
    }

    /// `endDateTime` wire value; empty means "now".
    pub fn end_date_time_str(&self) -> String {
        self.end_date_time.to_string()
    }

    /// `durationStr` wire value, e.g. `20 D`.
    pub fn duration_str(&self) -> String {
        self.duration.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_builds_now_request() {
        let request = HistoricalDataRequest::from_form(&HistoryForm::default()).expect("valid");
        assert_eq!(request.contract.symbol, "AUD");
        assert_eq!(request.contract.currency, "CAD");
        assert_eq!(request.end_date_time_str(), "");
        assert_eq!(request.duration_str(), "20 D");
        assert_eq!(request.bar_size, BarSize::OneDay);
        assert_eq!(request.what_to_show, WhatToShow::Midpoint);
        assert_eq!(request.use_rth.as_str(), "1");
    }

    #[test]
    fn malformed_pair_fails_before_anything_else() {
        let form = HistoryForm {
            currency: String::from("AUDCAD"),
            bar_size: String::from("bogus"),
            ..HistoryForm::default()
        };
        let err = HistoricalDataRequest::from_form(&form).expect_err("must fail");
        assert!(matches!(err, ValidationError::MalformedCurrencyPair { .. }));
    }

    #[test]
    fn form_fields_deserialize_with_defaults() {
        let form: HistoryForm =
            serde_json::from_str(r#"{"currency":"EUR.USD","edt_hour":9}"#).expect("valid json");
        assert_eq!(form.currency, "EUR.USD");
        assert_eq!(form.edt_hour, Some(9));
        assert_eq!(form.duration_unit, "D");
    }
}
