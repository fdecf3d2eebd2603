//! Client id generation.
//!
//! Clients written without an `id` receive a generated one during
//! validation.  Generation sits behind the [`ClientIdGenerator`]
//! trait so callers (and tests) can substitute a deterministic
//! scheme for the default random one.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Where in the document a client needing an id was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientScope {
    /// The document-wide `client` block.
    Document,
    /// The `client` block of the payslip at this index.
    Payslip(usize),
}

/// Produces ids for clients that were written without one.
///
/// Implementations must return a distinct id on every call; the
/// validator may ask for several ids in one pass.
pub trait ClientIdGenerator: Send + Sync {
    fn generate(&self, scope: ClientScope) -> String;
}

/// Default generator: `client-` followed by a random v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidClientIds;

impl ClientIdGenerator for UuidClientIds {
    fn generate(&self, _scope: ClientScope) -> String {
        format!("client-{}", Uuid::new_v4())
    }
}

/// Deterministic generator producing `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialClientIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialClientIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl ClientIdGenerator for SequentialClientIds {
    fn generate(&self, _scope: ClientScope) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
