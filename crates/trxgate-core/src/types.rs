//! # Domain Types
//!
//! Wire payloads and validated domain values for partner transactions.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Wire (as submitted)              Validated (after stage 1)            │
//! │  ┌──────────────────────────┐     ┌──────────────────────────┐         │
//! │  │ TransactionRequestPayload│ ──► │ TransactionRequest       │         │
//! │  │ LineItemPayload          │ ──► │ LineItem                 │         │
//! │  │ every field optional     │     │ lengths / ranges checked │         │
//! │  └──────────────────────────┘     └──────────────────────────┘         │
//! │                                                                         │
//! │  ┌──────────────────────────┐     ┌──────────────────────────┐         │
//! │  │ Partner                  │     │ TransactionResponse      │         │
//! │  │ key + stored password    │     │ result / message / sums  │         │
//! │  └──────────────────────────┘     └──────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payload fields are optional so a missing field surfaces as a structural
//! validation message instead of a decoder error.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::SUCCESS_MESSAGE;

// =============================================================================
// Wire Payloads
// =============================================================================

/// The JSON body posted by a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionRequestPayload {
    pub partnerkey: Option<String>,
    pub partnerrefno: Option<String>,
    /// Base64 encoding of the partner's password.
    pub partnerpassword: Option<String>,
    /// Minor units. Absent is treated as zero.
    #[serde(default)]
    pub totalamount: i64,
    pub items: Option<Vec<LineItemPayload>>,
    /// ISO-8601, UTC (`Z`) designator required.
    pub timestamp: Option<String>,
    pub sig: Option<String>,
}

impl TransactionRequestPayload {
    /// Copy safe to write to logs: the encoded password is masked.
    pub fn redacted(&self) -> Self {
        Self {
            partnerpassword: self.partnerpassword.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

/// One line item inside a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemPayload {
    pub partneritemref: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub unitprice: i64,
}

const REDACTED: &str = "[REDACTED]";

// =============================================================================
// Validated Request
// =============================================================================

/// A request that passed structural validation.
///
/// Produced only by [`crate::validation::validate_request`]; the timestamp
/// and signature are still raw strings because parsing them is a later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub partner_key: String,
    pub partner_ref_no: String,
    /// Base64 text exactly as submitted; the signature covers this form.
    pub partner_password: String,
    pub total_amount: Money,
    pub items: Vec<LineItem>,
    pub timestamp: String,
    pub signature: String,
}

/// A validated line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub item_ref: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

// =============================================================================
// Partner
// =============================================================================

/// A registered partner as held by a [`crate::directory::PartnerDirectory`].
#[derive(Clone, PartialEq, Eq)]
pub struct Partner {
    key: String,
    password: String,
}

impl Partner {
    pub fn new(key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored plaintext password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partner")
            .field("key", &self.key)
            .field("password", &REDACTED)
            .finish()
    }
}

// =============================================================================
// Response
// =============================================================================

/// `result` value of an accepted transaction.
pub const RESULT_SUCCESS: i32 = 1;

/// `result` value of a rejected transaction.
pub const RESULT_FAILURE: i32 = 0;

/// The JSON body returned to the partner.
///
/// Amount fields are present only when `result` is [`RESULT_SUCCESS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub result: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_discount: Option<Money>,
    pub result_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<Money>,
}

impl TransactionResponse {
    /// An accepted transaction.
    pub fn success(total_amount: Money, total_discount: Money, final_amount: Money) -> Self {
        Self {
            result: RESULT_SUCCESS,
            total_amount: Some(total_amount),
            total_discount: Some(total_discount),
            result_message: SUCCESS_MESSAGE.to_string(),
            final_amount: Some(final_amount),
        }
    }

    /// A rejected transaction carrying a single message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: RESULT_FAILURE,
            total_amount: None,
            total_discount: None,
            result_message: message.into(),
            final_amount: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
