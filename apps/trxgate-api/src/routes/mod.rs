//! HTTP route handlers.
//!
//! ```text
//! POST /api/submittrxmessage   transaction::submit_transaction
//! GET  /health                 health::liveness
//! ```

pub mod health;
pub mod transaction;
