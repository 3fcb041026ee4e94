use crate::domain::{PromoItem, SelectionKey};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::Result;
use std::time::Duration;

// Ports are the pluggable seams between the selection pipeline and its
// external collaborators: the content store, the cache storage, and the
// markup renderer.

/// Read-only query surface over persisted promo items.
///
/// `query_candidates` must return published items only, capped server-side
/// to `max_count` and pre-sorted by priority descending then recency
/// descending. The selector re-validates expiry and order as a backstop
/// rather than trusting the store completely.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    async fn query_candidates(&self, today: NaiveDate, max_count: usize) -> Result<Vec<PromoItem>>;

    /// Ids of items whose expiry date fell inside `[since, until)`. Used by
    /// the periodic sweep to catch items that crossed their expiry boundary
    /// without any triggering write.
    async fn expired_between(&self, since: NaiveDate, until: NaiveDate) -> Result<Vec<u64>>;
}

/// Key-value storage for computed selections, one slot per [`SelectionKey`].
///
/// Absence is a normal value: `get` on a missing or expired slot returns
/// `None`, and invalidating an absent key is a no-op. Implementations must
/// support concurrent access with atomic per-key replacement.
#[async_trait]
pub trait SelectionCache: Send + Sync + 'static {
    /// Returns the cached selection if present and not past its expiration.
    async fn get(&self, key: &SelectionKey) -> Option<Vec<PromoItem>>;

    /// Stores a selection wholesale, replacing any prior entry. A zero TTL
    /// stores the entry already stale.
    async fn set(&self, key: SelectionKey, items: Vec<PromoItem>, ttl: Duration);

    async fn invalidate(&self, key: &SelectionKey);

    async fn invalidate_all(&self);
}

/// Markup strategy injected into the rendered surfaces. Rendering is total:
/// it never fails for a well-formed item.
pub trait PromoRenderer: Send + Sync + 'static {
    fn render_blocks(&self, items: &[PromoItem]) -> String;

    fn render_empty(&self, message: &str) -> String;
}
