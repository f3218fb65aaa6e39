//! # Transaction Pipeline
//!
//! Runs the ordered checks on a partner request and prices it.
//!
//! ## Stage Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payload                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  1 structure ──► 2 timestamp format ──► 3 freshness ──► 4 partner      │
//! │                                                             │           │
//! │     ┌───────────────────────────────────────────────────────┘           │
//! │     ▼                                                                   │
//! │  5 password ──► 6 signature ──► 7 items ──► DiscountEngine ──► 200     │
//! │                                                                         │
//! │  Any stage Err ──► stop, report that message only                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order is part of the contract: a request with both a bad password
//! and a bad signature is always told about the password.

use std::sync::Arc;

use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

use crate::audit::AuditSink;
use crate::directory::PartnerDirectory;
use crate::error::{TransactionError, TransactionResult, INTERNAL_ERROR_MESSAGE};
use crate::types::{Partner, TransactionRequest, TransactionRequestPayload, TransactionResponse};
use crate::{discount, items, signature, timestamp, validation, DEFAULT_FRESHNESS_WINDOW_SECS};

/// `resultMessage` for bodies that could not be decoded at all.
pub const UNDECODABLE_BODY_MESSAGE: &str = "Validation failed.";

// =============================================================================
// Stages
// =============================================================================

/// State threaded through stages 2-7.
struct StageContext<'a> {
    request: &'a TransactionRequest,
    directory: &'a dyn PartnerDirectory,
    now: DateTime<Utc>,
    freshness_window: Duration,
    timestamp: Option<DateTime<Utc>>,
    partner: Option<Partner>,
}

impl StageContext<'_> {
    fn timestamp(&self) -> TransactionResult<DateTime<Utc>> {
        self.timestamp
            .ok_or(TransactionError::Internal("timestamp stage did not run"))
    }

    fn partner(&self) -> TransactionResult<&Partner> {
        self.partner
            .as_ref()
            .ok_or(TransactionError::Internal("partner stage did not run"))
    }
}

struct Stage {
    name: &'static str,
    run: fn(&mut StageContext<'_>) -> TransactionResult<()>,
}

/// Stages after structural validation, in evaluation order.
const STAGES: [Stage; 6] = [
    Stage {
        name: "timestamp_format",
        run: parse_timestamp,
    },
    Stage {
        name: "timestamp_freshness",
        run: check_freshness,
    },
    Stage {
        name: "partner",
        run: resolve_partner,
    },
    Stage {
        name: "password",
        run: check_password,
    },
    Stage {
        name: "signature",
        run: check_signature,
    },
    Stage {
        name: "items",
        run: check_items,
    },
];

fn parse_timestamp(ctx: &mut StageContext<'_>) -> TransactionResult<()> {
    let parsed = timestamp::parse_utc(&ctx.request.timestamp).ok_or(TransactionError::InvalidTimestamp)?;
    ctx.timestamp = Some(parsed);
    Ok(())
}

fn check_freshness(ctx: &mut StageContext<'_>) -> TransactionResult<()> {
    if !timestamp::is_fresh(ctx.timestamp()?, ctx.now, ctx.freshness_window) {
        return Err(TransactionError::Expired);
    }
    Ok(())
}

fn resolve_partner(ctx: &mut StageContext<'_>) -> TransactionResult<()> {
    let partner = ctx
        .directory
        .resolve(&ctx.request.partner_key)
        .ok_or(TransactionError::UnknownPartner)?;
    ctx.partner = Some(partner);
    Ok(())
}

fn check_password(ctx: &mut StageContext<'_>) -> TransactionResult<()> {
    if !password_matches(&ctx.request.partner_password, ctx.partner()?.password()) {
        return Err(TransactionError::InvalidPassword);
    }
    Ok(())
}

fn check_signature(ctx: &mut StageContext<'_>) -> TransactionResult<()> {
    let request = ctx.request;
    let expected = signature::compute(
        &ctx.timestamp()?,
        &request.partner_key,
        &request.partner_ref_no,
        request.total_amount,
        &request.partner_password,
    );
    if !signature::matches(&expected, &request.signature) {
        return Err(TransactionError::SignatureMismatch);
    }
    Ok(())
}

fn check_items(ctx: &mut StageContext<'_>) -> TransactionResult<()> {
    if ctx.request.items.is_empty() {
        return Ok(());
    }
    items::check(&ctx.request.items, ctx.request.total_amount)
}

/// Decodes the submitted base64 password and compares it with the stored
/// one. Undecodable input is a mismatch.
pub fn password_matches(encoded: &str, stored: &str) -> bool {
    let Ok(bytes) = BASE64_STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(bytes) else {
        return false;
    };
    let stored = stored.as_bytes();
    decoded.len() == stored.len() && bool::from(decoded.as_bytes().ct_eq(stored))
}

// =============================================================================
// Pipeline
// =============================================================================

/// Validates partner transactions and computes their discount.
///
/// Stateless between calls; share one instance across request handlers.
#[derive(Clone)]
pub struct TransactionPipeline {
    directory: Arc<dyn PartnerDirectory>,
    audit: Arc<dyn AuditSink>,
    freshness_window: Duration,
}

impl TransactionPipeline {
    pub fn new(directory: Arc<dyn PartnerDirectory>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            directory,
            audit,
            freshness_window: Duration::seconds(DEFAULT_FRESHNESS_WINDOW_SECS),
        }
    }

    /// Overrides the allowed clock skew (default five minutes).
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Processes a request against the current server time.
    pub fn process(&self, payload: &TransactionRequestPayload) -> TransactionResult<TransactionResponse> {
        self.process_at(payload, Utc::now())
    }

    /// Processes a request as if the server clock read `now`.
    ///
    /// Both the request and the resulting response are handed to the audit
    /// sink, whichever way the request goes.
    pub fn process_at(
        &self,
        payload: &TransactionRequestPayload,
        now: DateTime<Utc>,
    ) -> TransactionResult<TransactionResponse> {
        let correlation_id = Uuid::new_v4();
        self.audit.request_received(correlation_id, &payload.redacted());

        let outcome = self.evaluate(payload, now);
        if let Err(err) = &outcome {
            debug!(%correlation_id, category = ?err.category(), error = %err, "transaction rejected");
        }

        let response = match &outcome {
            Ok(response) => response.clone(),
            Err(err) => TransactionResponse::failure(err.public_message()),
        };
        self.audit.response_sent(correlation_id, &response);

        outcome
    }

    /// Audits a body that never decoded into a payload and returns the
    /// failure response for it.
    pub fn reject_undecodable(&self, body: &str, reason: &str) -> TransactionResponse {
        let correlation_id = Uuid::new_v4();
        self.audit.body_rejected(correlation_id, body, reason);

        let response = TransactionResponse::failure(UNDECODABLE_BODY_MESSAGE);
        self.audit.response_sent(correlation_id, &response);
        response
    }

    /// Audits and returns the generic failure sent when processing was cut
    /// short, e.g. by a panic.
    ///
    /// The record carries a fresh correlation id: the aborted invocation's
    /// id is lost with its stack.
    pub fn report_internal_fault(&self) -> TransactionResponse {
        let response = TransactionResponse::failure(INTERNAL_ERROR_MESSAGE);
        self.audit.response_sent(Uuid::new_v4(), &response);
        response
    }

    fn evaluate(
        &self,
        payload: &TransactionRequestPayload,
        now: DateTime<Utc>,
    ) -> TransactionResult<TransactionResponse> {
        let request = validation::validate_request(payload)?;

        let mut ctx = StageContext {
            request: &request,
            directory: self.directory.as_ref(),
            now,
            freshness_window: self.freshness_window,
            timestamp: None,
            partner: None,
        };
        for stage in &STAGES {
            (stage.run)(&mut ctx).inspect_err(|_| debug!(stage = stage.name, "stage failed"))?;
        }

        let priced = discount::compute(request.total_amount)?;
        Ok(TransactionResponse::success(
            request.total_amount,
            priced.discount,
            priced.final_amount,
        ))
    }
}

impl std::fmt::Debug for TransactionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionPipeline")
            .field("freshness_window", &self.freshness_window)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
