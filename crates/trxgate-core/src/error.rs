//! # Error Types
//!
//! Domain-specific error types for trxgate-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  trxgate-core errors (this file)                                       │
//! │  ├── ValidationError   - Structural field failures (stage 1)           │
//! │  └── TransactionError  - Any pipeline failure, first one wins          │
//! │                                                                         │
//! │  discount.rs                                                           │
//! │  └── DiscountError     - Amount outside every tier                     │
//! │                                                                         │
//! │  trxgate-api errors (app)                                              │
//! │  └── ApiError          - Startup / serving failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → TransactionError → TransactionResponse        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Display` text of every variant is exactly the `resultMessage` a
//! partner receives, so these strings are part of the wire contract.

use thiserror::Error;

use crate::discount::DiscountError;

// =============================================================================
// Validation Error
// =============================================================================

/// Structural validation failures on the inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required top-level field is missing, empty or whitespace.
    #[error("{field} is required.")]
    Required { field: &'static str },

    /// A required line-item field is missing, empty or whitespace.
    #[error("{field} is required for each item.")]
    RequiredForItem { field: &'static str },

    /// Field value is longer than allowed (counted in characters).
    #[error("{field} must not exceed {max} characters.")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive.")]
    MustBePositive { field: &'static str },

    /// Numeric value is outside an inclusive range.
    #[error("{field} must be greater than {} and not exceed {max}.", .min - 1)]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

// =============================================================================
// Transaction Error
// =============================================================================

/// Broad class of a pipeline failure.
///
/// ## Mapping
/// ```text
/// StructuralValidation  missing / oversized / out-of-range field
/// Timestamp             unparseable or expired timestamp
/// Authentication        unknown partner, bad password, bad signature
/// BusinessRule          line items don't add up
/// Internal              fault the partner cannot fix
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    StructuralValidation,
    Timestamp,
    Authentication,
    BusinessRule,
    Internal,
}

/// A failed transaction request. Only the first detected failure is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Structural(#[from] ValidationError),

    #[error("Invalid timestamp format.")]
    InvalidTimestamp,

    #[error("Expired.")]
    Expired,

    #[error("Invalid or unauthorized partner.")]
    UnknownPartner,

    #[error("Invalid partner password.")]
    InvalidPassword,

    #[error("Signature mismatch.")]
    SignatureMismatch,

    #[error("Invalid Total Amount.")]
    InvalidTotalAmount,

    /// A discount could not be computed for an otherwise valid request.
    #[error("Discount calculation failed: {0}")]
    Discount(#[from] DiscountError),

    /// The pipeline reached a stage without the state an earlier stage
    /// should have produced.
    #[error("Internal pipeline error: {0}")]
    Internal(&'static str),
}

impl TransactionError {
    /// Classifies the failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Structural(_) => ErrorCategory::StructuralValidation,
            Self::InvalidTimestamp | Self::Expired => ErrorCategory::Timestamp,
            Self::UnknownPartner | Self::InvalidPassword | Self::SignatureMismatch => {
                ErrorCategory::Authentication
            }
            Self::InvalidTotalAmount => ErrorCategory::BusinessRule,
            Self::Discount(_) | Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Whether the partner can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        self.category() != ErrorCategory::Internal
    }

    /// The message placed in `resultMessage`.
    ///
    /// Internal faults are reported generically; their detail stays in logs.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

/// `resultMessage` for faults that are not the partner's doing.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for pipeline results.
pub type TransactionResult<T> = Result<T, TransactionError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "partnerkey",
        };
        assert_eq!(err.to_string(), "partnerkey is required.");

        let err = ValidationError::RequiredForItem { field: "name" };
        assert_eq!(err.to_string(), "name is required for each item.");

        let err = ValidationError::TooLong {
            field: "partnerrefno",
            max: 50,
        };
        assert_eq!(
            err.to_string(),
            "partnerrefno must not exceed 50 characters."
        );

        let err = ValidationError::OutOfRange {
            field: "qty",
            min: 2,
            max: 5,
        };
        assert_eq!(
            err.to_string(),
            "qty must be greater than 1 and not exceed 5."
        );
    }

    #[test]
    fn test_transaction_error_messages() {
        assert_eq!(TransactionError::Expired.to_string(), "Expired.");
        assert_eq!(
            TransactionError::InvalidPassword.to_string(),
            "Invalid partner password."
        );
        assert_eq!(
            TransactionError::InvalidTotalAmount.to_string(),
            "Invalid Total Amount."
        );
    }

    #[test]
    fn test_structural_is_transparent() {
        let err: TransactionError = ValidationError::MustBePositive {
            field: "totalamount",
        }
        .into();
        assert_eq!(err.to_string(), "totalamount must be positive.");
        assert_eq!(err.category(), ErrorCategory::StructuralValidation);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            TransactionError::InvalidTimestamp.category(),
            ErrorCategory::Timestamp
        );
        assert_eq!(
            TransactionError::SignatureMismatch.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            TransactionError::InvalidTotalAmount.category(),
            ErrorCategory::BusinessRule
        );
        assert!(!TransactionError::Internal("x").is_client_error());
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = TransactionError::Discount(DiscountError::NoTier {
            amount: Money::from_minor(50050),
        });
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.to_string().contains("500.50"));
    }
}
