//! # trxgate-core: Partner Transaction Logic
//!
//! Decides whether a partner's transaction request is accepted and computes
//! the discount it earns. The HTTP service in `apps/trxgate-api` is a thin
//! shell around [`TransactionPipeline`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        trxgate Request Flow                             │
//! │                                                                         │
//! │  POST /api/submittrxmessage (trxgate-api, axum)                        │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ trxgate-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  TransactionPipeline                                            │   │
//! │  │   1 structure → 2 timestamp → 3 freshness → 4 partner           │   │
//! │  │   → 5 password → 6 signature → 7 items → DiscountEngine         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ directory │  │ signature │  │ discount  │  │   items   │  │   │
//! │  │   │  (trait)  │  │  SHA-256  │  │  tiers    │  │  Σ qty×p  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │                          AuditSink (trait)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire payloads, validated request, partner, response
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Validation and pipeline error types
//! - [`validation`] - Structural field validation
//! - [`timestamp`] - UTC timestamp parsing and freshness
//! - [`directory`] - Partner lookup seam
//! - [`signature`] - Request signature computation
//! - [`discount`] - Tiered discount engine
//! - [`items`] - Line-item consistency
//! - [`audit`] - Audit sink seam
//! - [`pipeline`] - The ordered validation pipeline
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use trxgate_core::directory::InMemoryPartnerDirectory;
//! use trxgate_core::audit::NoopAuditSink;
//! use trxgate_core::TransactionPipeline;
//!
//! let pipeline = TransactionPipeline::new(
//!     Arc::new(InMemoryPartnerDirectory::seeded()),
//!     Arc::new(NoopAuditSink),
//! );
//! # let _ = pipeline;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod directory;
pub mod discount;
pub mod error;
pub mod items;
pub mod money;
pub mod pipeline;
pub mod signature;
pub mod timestamp;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ErrorCategory, TransactionError, ValidationError};
pub use money::Money;
pub use pipeline::TransactionPipeline;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of partner key, reference number, password and item ref.
pub const MAX_IDENTIFIER_LEN: usize = 50;

/// Maximum length of a line item name.
pub const MAX_ITEM_NAME_LEN: usize = 100;

/// Minimum quantity per line item.
pub const MIN_ITEM_QUANTITY: i64 = 2;

/// Maximum quantity per line item.
pub const MAX_ITEM_QUANTITY: i64 = 5;

/// Allowed clock skew between a request timestamp and server time.
pub const DEFAULT_FRESHNESS_WINDOW_SECS: i64 = 5 * 60;

/// Message used on success responses.
pub const SUCCESS_MESSAGE: &str = "Success";
