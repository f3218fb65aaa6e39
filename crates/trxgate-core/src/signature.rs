//! # Request Signature
//!
//! Partners sign every request so the gateway can tell it was produced by
//! someone holding the partner password and was not altered in transit.
//!
//! ## Canonical Form
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  yyyyMMddHHmmss  +  partnerkey  +  partnerrefno  +  totalamount         │
//! │  (UTC, no seps)                                    (decimal minor)      │
//! │                  +  partnerpassword (base64 text as submitted)          │
//! │                                                                         │
//! │  sig = base64( SHA-256( utf8(canonical) ) )                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trxgate_core::money::Money;
//! use trxgate_core::signature;
//!
//! let ts = Utc.with_ymd_and_hms(2024, 8, 15, 2, 11, 22).unwrap();
//! let sig = signature::compute(&ts, "FAKEGOOGLE", "FG-00001", Money::from_minor(1000), "RkFLRVBBU1NXT1JEMTIzNA==");
//! assert_eq!(sig.len(), 44);
//! ```

use base64::prelude::*;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::money::Money;

/// `chrono` format string for the signed timestamp.
pub const SIGNATURE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Builds the string that gets hashed.
pub fn canonical_string(
    timestamp: &DateTime<Utc>,
    partner_key: &str,
    partner_ref_no: &str,
    total_amount: Money,
    partner_password: &str,
) -> String {
    format!(
        "{}{}{}{}{}",
        timestamp.format(SIGNATURE_TIMESTAMP_FORMAT),
        partner_key,
        partner_ref_no,
        total_amount.minor(),
        partner_password
    )
}

/// Computes the expected signature for a request.
pub fn compute(
    timestamp: &DateTime<Utc>,
    partner_key: &str,
    partner_ref_no: &str,
    total_amount: Money,
    partner_password: &str,
) -> String {
    let canonical = canonical_string(
        timestamp,
        partner_key,
        partner_ref_no,
        total_amount,
        partner_password,
    );
    let digest = Sha256::digest(canonical.as_bytes());
    BASE64_STANDARD.encode(digest)
}

/// Compares a submitted signature with the expected one.
///
/// The submitted value is trimmed; the comparison itself runs in constant
/// time for equal-length inputs.
pub fn matches(expected: &str, submitted: &str) -> bool {
    let submitted = submitted.trim().as_bytes();
    let expected = expected.as_bytes();
    if submitted.len() != expected.len() {
        return false;
    }
    expected.ct_eq(submitted).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const PASSWORD_B64: &str = "RkFLRVBBU1NXT1JEMTIzNA==";

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 15, 2, 11, 22).unwrap()
    }

    fn sig() -> String {
        compute(&ts(), "FAKEGOOGLE", "FG-00001", Money::from_minor(1000), PASSWORD_B64)
    }

    #[test]
    fn test_canonical_string_layout() {
        let canonical = canonical_string(
            &ts(),
            "FAKEGOOGLE",
            "FG-00001",
            Money::from_minor(1000),
            PASSWORD_B64,
        );
        assert_eq!(
            canonical,
            "20240815021122FAKEGOOGLEFG-000011000RkFLRVBBU1NXT1JEMTIzNA=="
        );
    }

    #[test]
    fn test_canonical_timestamp_drops_subseconds() {
        let with_millis = ts() + Duration::milliseconds(987);
        assert_eq!(
            canonical_string(&with_millis, "K", "R", Money::from_minor(1), "P"),
            canonical_string(&ts(), "K", "R", Money::from_minor(1), "P"),
        );
    }

    #[test]
    fn test_known_digest() {
        // SHA-256("abc") in base64
        let digest = Sha256::digest(b"abc");
        assert_eq!(
            BASE64_STANDARD.encode(digest),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_reference_vector() {
        assert_eq!(sig(), "AX4NiI06xU0O7fbmbina7ozFdFkj3cp13MmQyGG+ARM=");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(sig(), sig());
        assert_eq!(sig().len(), 44);
    }

    #[test]
    fn test_every_input_changes_signature() {
        let base = sig();
        let amount = Money::from_minor(1000);
        assert_ne!(base, compute(&(ts() + Duration::seconds(1)), "FAKEGOOGLE", "FG-00001", amount, PASSWORD_B64));
        assert_ne!(base, compute(&ts(), "FAKEPEOPLE", "FG-00001", amount, PASSWORD_B64));
        assert_ne!(base, compute(&ts(), "FAKEGOOGLE", "FG-00002", amount, PASSWORD_B64));
        assert_ne!(base, compute(&ts(), "FAKEGOOGLE", "FG-00001", Money::from_minor(1001), PASSWORD_B64));
        assert_ne!(base, compute(&ts(), "FAKEGOOGLE", "FG-00001", amount, "RkFLRVBBU1NXT1JEMTIzNQ=="));
    }

    #[test]
    fn test_matches_trims_submitted() {
        let expected = sig();
        assert!(matches(&expected, &expected));
        assert!(matches(&expected, &format!("  {}\n", expected)));
        assert!(!matches(&expected, &expected.to_lowercase()));
        assert!(!matches(&expected, ""));
    }
}
