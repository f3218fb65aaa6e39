//! # Validation Module
//!
//! Structural validation of a submitted payload (pipeline stage 1).
//!
//! ## Field Order
//! ```text
//! partnerkey → partnerrefno → partnerpassword → totalamount
//!   → items[i]: partneritemref → name → qty → unitprice
//!   → timestamp → sig
//! ```
//! The first violated field in this order is the one reported.
//!
//! ## Usage
//! ```rust
//! use trxgate_core::validation::validate_identifier;
//!
//! assert!(validate_identifier("partnerkey", Some("FAKEGOOGLE")).is_ok());
//! assert!(validate_identifier("partnerkey", Some("   ")).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, LineItemPayload, TransactionRequest, TransactionRequestPayload};
use crate::{MAX_IDENTIFIER_LEN, MAX_ITEM_NAME_LEN, MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Validator
// =============================================================================

/// Validates a payload and converts it into a [`TransactionRequest`].
///
/// String values are kept as submitted (no trimming); only the presence
/// check ignores surrounding whitespace.
pub fn validate_request(payload: &TransactionRequestPayload) -> ValidationResult<TransactionRequest> {
    let partner_key = validate_identifier("partnerkey", payload.partnerkey.as_deref())?;
    let partner_ref_no = validate_identifier("partnerrefno", payload.partnerrefno.as_deref())?;
    let partner_password =
        validate_identifier("partnerpassword", payload.partnerpassword.as_deref())?;
    let total_amount = validate_positive_amount("totalamount", payload.totalamount)?;

    let items = payload
        .items
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(validate_item)
        .collect::<ValidationResult<Vec<_>>>()?;

    let timestamp = required("timestamp", payload.timestamp.as_deref())?;
    let signature = required("sig", payload.sig.as_deref())?;

    Ok(TransactionRequest {
        partner_key: partner_key.to_string(),
        partner_ref_no: partner_ref_no.to_string(),
        partner_password: partner_password.to_string(),
        total_amount,
        items,
        timestamp: timestamp.to_string(),
        signature: signature.to_string(),
    })
}

/// Validates one line item.
pub fn validate_item(item: &LineItemPayload) -> ValidationResult<LineItem> {
    let item_ref = required_for_item("partneritemref", item.partneritemref.as_deref())?;
    check_length("partneritemref", item_ref, MAX_IDENTIFIER_LEN)?;

    let name = required_for_item("name", item.name.as_deref())?;
    check_length("name", name, MAX_ITEM_NAME_LEN)?;

    validate_quantity(item.qty)?;
    let unit_price = validate_positive_amount("unitprice", item.unitprice)?;

    Ok(LineItem {
        item_ref: item_ref.to_string(),
        name: name.to_string(),
        quantity: item.qty,
        unit_price,
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required identifier of at most 50 characters.
pub fn validate_identifier<'a>(field: &'static str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    let value = required(field, value)?;
    check_length(field, value, MAX_IDENTIFIER_LEN)?;
    Ok(value)
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Required { field }),
    }
}

fn required_for_item<'a>(field: &'static str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::RequiredForItem { field }),
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity (2 to 5 inclusive).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "qty",
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates an amount in minor units that must be strictly positive.
pub fn validate_positive_amount(field: &'static str, minor: i64) -> ValidationResult<Money> {
    let amount = Money::from_minor(minor);
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive { field });
    }
    Ok(amount)
}

// =============================================================================
// Unit Tests
// =============================================================================
