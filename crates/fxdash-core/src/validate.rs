use tracing::{info, warn};

use crate::{BrokerError, ContractDetails};

/// Outcome of checking a resolved contract against the typed pair.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractCheck {
    /// Proceed to the history fetch with the resolved contract.
    Matched {
        message: String,
        details: ContractDetails,
    },
    /// Stop; carries the user-facing error message.
    Rejected(String),
}

impl ContractCheck {
    pub fn message(&self) -> &str {
        match self {
            Self::Matched { message, .. } | Self::Rejected(message) => message,
        }
    }

    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Compare one resolution result with the pair string the user typed.
///
/// Equality is exact; the pair is read from the 11th field of the
/// comma-delimited description.
pub fn verify_contract(
    resolution: Result<ContractDetails, BrokerError>,
    input: &str,
) -> ContractCheck {
    let details = match resolution {
        Ok(details) => details,
        Err(error) => {
            warn!(code = error.code(), input, "contract resolution failed");
            return ContractCheck::Rejected(resolution_failed_message(&error));
        }
    };

    let resolved = details.pair_field().unwrap_or_default();
    if resolved == input {
        info!(input, "contract matched");
        ContractCheck::Matched {
            message: format!("We've found the right contract! Submitted query for {input}"),
            details,
        }
    } else {
        warn!(input, resolved = %resolved, "contract mismatch");
        ContractCheck::Rejected(format!(
            "Contract symbol {resolved} does not match with the input {input}"
        ))
    }
}

fn resolution_failed_message(error: &BrokerError) -> String {
    format!("Error: {}! Please check your input!", error.message())
}
