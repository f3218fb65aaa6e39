//! # Transaction Submission
//!
//! `POST /api/submittrxmessage`
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pipeline Ok                        → 200  result=1                     │
//! │  any partner-fixable failure        → 400  result=0  first message      │
//! │  body not decodable as a payload    → 400  result=0  Validation failed. │
//! │  (audited with the submitted text, password redacted)                  │
//! │  body over the size limit           → 413  result=0  Validation failed. │
//! │  internal fault (e.g. discount gap) → 500  result=0  generic message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info, warn};
use trxgate_core::{TransactionError, TransactionRequestPayload, TransactionResponse};

use crate::AppState;

pub const SUBMIT_PATH: &str = "/api/submittrxmessage";

const PASSWORD_FIELD: &str = "partnerpassword";
const REDACTED: &str = "[REDACTED]";

pub fn router() -> Router<AppState> {
    Router::new().route(SUBMIT_PATH, post(submit_transaction))
}

/// HTTP status for a pipeline failure.
pub fn status_for(err: &TransactionError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Audit text for a body that failed to decode.
///
/// Well-formed JSON objects get their password replaced; anything else is
/// kept as submitted (lossy UTF-8), already bounded by the body limit.
pub fn audit_text(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => {
            if let Some(password) = fields.get_mut(PASSWORD_FIELD) {
                *password = Value::String(REDACTED.to_string());
            }
            Value::Object(fields).to_string()
        }
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

/// POST /api/submittrxmessage. Validates and prices one transaction.
async fn submit_transaction(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<TransactionResponse>) {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            let reason = rejection.body_text();
            warn!(status = %rejection.status(), %reason, "transaction body not read");

            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, Json(state.pipeline.reject_undecodable("", &reason)));
        }
    };

    let payload: TransactionRequestPayload = match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        Err(err) => {
            let reason = err.to_string();
            warn!(%reason, "undecodable transaction body");
            let response = state.pipeline.reject_undecodable(&audit_text(&bytes), &reason);
            return (StatusCode::BAD_REQUEST, Json(response));
        }
    };

    let partner_key = payload.partnerkey.as_deref().unwrap_or_default();
    match state.pipeline.process(&payload) {
        Ok(response) => {
            info!(
                partner_key,
                total_amount = %payload.totalamount,
                result = response.result,
                "transaction accepted"
            );
            (StatusCode::OK, Json(response))
        }
        Err(err) => {
            let status = status_for(&err);
            if err.is_client_error() {
                info!(partner_key, %status, reason = %err, "transaction rejected");
            } else {
                error!(partner_key, error = %err, "transaction failed");
            }
            (status, Json(TransactionResponse::failure(err.public_message())))
        }
    }
}
