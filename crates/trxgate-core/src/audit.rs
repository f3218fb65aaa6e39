//! Audit trail seam.
//!
//! The pipeline reports every inbound request and every outbound response
//! to an [`AuditSink`]. Delivery is fire-and-forget: a sink must not fail
//! the request, so the methods return nothing.

use uuid::Uuid;

use crate::types::{TransactionRequestPayload, TransactionResponse};

/// Receives audit records. `correlation_id` pairs a request with its response.
pub trait AuditSink: Send + Sync {
    /// Called once per invocation, before any check runs. The payload has its
    /// password redacted.
    fn request_received(&self, correlation_id: Uuid, payload: &TransactionRequestPayload);

    /// Called instead of `request_received` when the body never decoded
    /// into a payload. `body` is the submitted text, with the password
    /// redacted when the body was at least well-formed JSON.
    fn body_rejected(&self, correlation_id: Uuid, body: &str, reason: &str);

    /// Called once per invocation with the response that will be sent.
    fn response_sent(&self, correlation_id: Uuid, response: &TransactionResponse);
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn request_received(&self, _correlation_id: Uuid, _payload: &TransactionRequestPayload) {}

    fn body_rejected(&self, _correlation_id: Uuid, _body: &str, _reason: &str) {}

    fn response_sent(&self, _correlation_id: Uuid, _response: &TransactionResponse) {}
}
