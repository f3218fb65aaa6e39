//! # Telemetry
//!
//! Log subscriber setup and the audit sink that writes through it.
//!
//! ## Audit Records
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  target: trxgate::audit   level: INFO                                   │
//! │                                                                         │
//! │  {"correlation_id":"…","kind":"request","body":{…password redacted…}}  │
//! │  {"correlation_id":"…","kind":"response","body":{"result":1,…}}        │
//! │  {"correlation_id":"…","kind":"rejected","body":{"body":…,"reason":…}} │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Filter audit lines with `RUST_LOG=trxgate::audit=info`.

use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trxgate_core::audit::AuditSink;
use trxgate_core::{TransactionRequestPayload, TransactionResponse};
use uuid::Uuid;

use crate::config::LogFormat;
use crate::error::ApiError;

/// `tracing` target of audit records.
pub const AUDIT_TARGET: &str = "trxgate::audit";

/// Installs the global subscriber. `RUST_LOG`, when set, wins over `level`.
pub fn init_tracing(format: LogFormat, level: &str) -> Result<(), ApiError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| ApiError::Telemetry(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.with_thread_ids(true).pretty().try_init(),
    };
    installed.map_err(|e| ApiError::Telemetry(e.to_string()))
}

#[derive(Serialize)]
struct AuditRecord<'a, T: Serialize + ?Sized> {
    correlation_id: Uuid,
    kind: &'static str,
    body: &'a T,
}

#[derive(Serialize)]
struct RejectedBody<'a> {
    body: &'a str,
    reason: &'a str,
}

/// Serializes one audit record.
pub fn audit_record<T: Serialize + ?Sized>(
    correlation_id: Uuid,
    kind: &'static str,
    body: &T,
) -> serde_json::Result<String> {
    serde_json::to_string(&AuditRecord {
        correlation_id,
        kind,
        body,
    })
}

/// Writes audit records as JSON `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    fn emit<T: Serialize + ?Sized>(&self, correlation_id: Uuid, kind: &'static str, body: &T) {
        match audit_record(correlation_id, kind, body) {
            Ok(record) => info!(target: AUDIT_TARGET, %correlation_id, kind, %record, "audit"),
            Err(err) => warn!(
                target: AUDIT_TARGET,
                %correlation_id,
                kind,
                error = %err,
                "audit record could not be serialized"
            ),
        }
    }
}

impl AuditSink for TracingAuditSink {
    fn request_received(&self, correlation_id: Uuid, payload: &TransactionRequestPayload) {
        self.emit(correlation_id, "request", payload);
    }

    fn body_rejected(&self, correlation_id: Uuid, body: &str, reason: &str) {
        self.emit(correlation_id, "rejected", &RejectedBody { body, reason });
    }

    fn response_sent(&self, correlation_id: Uuid, response: &TransactionResponse) {
        self.emit(correlation_id, "response", response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_record_carries_redacted_payload() {
        let payload = TransactionRequestPayload {
            partnerkey: Some("FAKEGOOGLE".to_string()),
            partnerpassword: Some("RkFLRVBBU1NXT1JEMTIzNA==".to_string()),
            totalamount: 1000,
            ..Default::default()
        };
        let id = Uuid::new_v4();
        let record = audit_record(id, "request", &payload.redacted()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&record).unwrap();

        assert_eq!(json["correlation_id"], id.to_string());
        assert_eq!(json["kind"], "request");
        assert_eq!(json["body"]["partnerkey"], "FAKEGOOGLE");
        assert_eq!(json["body"]["partnerpassword"], "[REDACTED]");
        assert!(!record.contains("RkFLRVBBU1NXT1JEMTIzNA=="));
    }

    #[test]
    fn test_response_record() {
        let record = audit_record(Uuid::nil(), "response", &TransactionResponse::failure("Expired.")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&record).unwrap();
        assert_eq!(json["body"]["result"], 0);
        assert_eq!(json["body"]["resultMessage"], "Expired.");
    }

    #[test]
    fn test_rejected_record_carries_body_and_reason() {
        let rejected = RejectedBody {
            body: r#"{"partnerkey":"FAKEGOOGLE","#,
            reason: "EOF while parsing an object",
        };
        let record = audit_record(Uuid::nil(), "rejected", &rejected).unwrap();
        let json: serde_json::Value = serde_json::from_str(&record).unwrap();
        assert_eq!(json["body"]["body"], r#"{"partnerkey":"FAKEGOOGLE","#);
        assert_eq!(json["body"]["reason"], "EOF while parsing an object");
    }

    #[test]
    fn test_sink_never_panics_without_subscriber() {
        let sink = TracingAuditSink;
        sink.request_received(Uuid::nil(), &TransactionRequestPayload::default());
        sink.body_rejected(Uuid::nil(), "{", "bad");
        sink.response_sent(Uuid::nil(), &TransactionResponse::failure("x"));
    }
}
