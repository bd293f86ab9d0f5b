//! Form state and the submission gate
//!
//! Recipient and amount are kept as raw text, updated on every keystroke with
//! no live validation. The only check happens when the user submits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::{AmountError, AmountPolicy, ParsedAmount};
use crate::selector::NetworkSelection;
use crate::types::NetworkId;

/// Why the submission gate refused to start a transfer
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRejection {
    #[error("recipient address is empty")]
    EmptyRecipient,
    #[error("amount is empty")]
    EmptyAmount,
    #[error("source network is not selected")]
    SourceUnset,
    #[error("destination network is not selected")]
    DestinationUnset,
    #[error("amount is malformed: {0}")]
    MalformedAmount(AmountError),
}

/// A request that passed the gate, handed to the transfer operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: ParsedAmount,
    pub source: NetworkId,
    pub destination: NetworkId,
}

impl TransferRequest {
    /// The float amount passed to the transfer callback (NaN if malformed)
    pub fn amount_f64(&self) -> f64 {
        self.amount.as_f64()
    }
}

/// Raw text of the two input fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    recipient: String,
    amount: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn set_recipient(&mut self, text: impl Into<String>) {
        self.recipient = text.into();
    }

    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.amount = text.into();
    }

    /// Reset both fields to empty strings
    pub fn clear(&mut self) {
        self.recipient.clear();
        self.amount.clear();
    }

    /// Run the submission gate.
    ///
    /// A field counts as filled when it is a non-empty string; whitespace is
    /// not stripped. The amount is parsed only once the emptiness checks pass.
    pub fn validate(
        &self,
        selection: NetworkSelection,
        policy: AmountPolicy,
    ) -> Result<TransferRequest, GateRejection> {
        if self.recipient.is_empty() {
            return Err(GateRejection::EmptyRecipient);
        }
        if self.amount.is_empty() {
            return Err(GateRejection::EmptyAmount);
        }
        if !selection.source.is_set() {
            return Err(GateRejection::SourceUnset);
        }
        if !selection.destination.is_set() {
            return Err(GateRejection::DestinationUnset);
        }

        let amount = ParsedAmount::parse(&self.amount);
        if policy == AmountPolicy::Reject {
            if let Some(error) = amount.error() {
                return Err(GateRejection::MalformedAmount(error.clone()));
            }
        }

        Ok(TransferRequest {
            recipient: self.recipient.clone(),
            amount,
            source: selection.source,
            destination: selection.destination,
        })
    }
}
