use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const SEPARATOR: char = '.';

/// FX pair as typed by the user, e.g. `AUD.CAD`.
///
/// Case is preserved: the text is later compared verbatim against the local
/// symbol the brokerage resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    raw: String,
    split: usize,
}

impl CurrencyPair {
    /// Parse `BASE.QUOTE`. Exactly one separator and two non-empty tokens.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let malformed = || ValidationError::MalformedCurrencyPair {
            value: input.to_owned(),
        };

        let mut tokens = trimmed.split(SEPARATOR);
        let (Some(base), Some(quote), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(malformed());
        };

        for token in [base, quote] {
            if token.is_empty() || !token.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                return Err(malformed());
            }
        }

        Ok(Self {
            raw: trimmed.to_owned(),
            split: base.len(),
        })
    }

    pub fn base(&self) -> &str {
        &self.raw[..self.split]
    }

    pub fn quote(&self) -> &str {
        &self.raw[self.split + SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CurrencyPair {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CurrencyPair> for String {
    fn from(value: CurrencyPair) -> Self {
        value.raw
    }
}
