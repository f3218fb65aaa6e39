//! Partner lookup.
//!
//! The pipeline only ever asks "who is this key?". Storage sits behind
//! [`PartnerDirectory`] so a database-backed directory can replace the
//! in-memory one without touching pipeline code.

use std::collections::HashMap;

use crate::types::Partner;

/// Read-only partner lookup. Matching is exact and case-sensitive.
pub trait PartnerDirectory: Send + Sync {
    /// Returns the partner registered under `key`, if any.
    fn resolve(&self, key: &str) -> Option<Partner>;
}

/// A fixed set of partners held in memory.
///
/// Immutable after construction, so concurrent reads need no locking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPartnerDirectory {
    partners: HashMap<String, Partner>,
}

impl InMemoryPartnerDirectory {
    /// Builds a directory from an iterator of partners. A later entry with
    /// the same key replaces an earlier one.
    pub fn from_partners(partners: impl IntoIterator<Item = Partner>) -> Self {
        let partners = partners
            .into_iter()
            .map(|p| (p.key().to_string(), p))
            .collect();
        Self { partners }
    }

    /// The two sandbox partners every deployment starts with.
    pub fn seeded() -> Self {
        Self::from_partners([
            Partner::new("FAKEGOOGLE", "FAKEPASSWORD1234"),
            Partner::new("FAKEPEOPLE", "FAKEPASSWORD4578"),
        ])
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

impl PartnerDirectory for InMemoryPartnerDirectory {
    fn resolve(&self, key: &str) -> Option<Partner> {
        self.partners.get(key).cloned()
    }
}
