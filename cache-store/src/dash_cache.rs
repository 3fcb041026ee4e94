use async_trait::async_trait;
use dashmap::DashMap;
use promo::domain::{PromoItem, SelectionKey};
use promo::ports::SelectionCache;
use std::time::{Duration, Instant};
use tracing::trace;

struct CacheEntry {
    items: Vec<PromoItem>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Concurrent TTL cache for computed selections, one slot per
/// [`SelectionKey`]. Entries are replaced wholesale; readers never observe
/// a half-written selection because dashmap serializes per-key access.
///
/// Expired entries are dropped lazily on the next `get` that touches them.
pub struct DashSelectionCache {
    slots: DashMap<SelectionKey, CacheEntry>,
}

impl DashSelectionCache {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Number of live (possibly stale) slots, for observability.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl Default for DashSelectionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SelectionCache for DashSelectionCache {
    async fn get(&self, key: &SelectionKey) -> Option<Vec<PromoItem>> {
        let now = Instant::now();

        match self.slots.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.items.clone()),
            Some(entry) => {
                drop(entry);
                // Stale: drop the slot unless a concurrent set already
                // replaced it with a fresh entry.
                self.slots.remove_if(key, |_, e| !e.is_fresh(now));
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: SelectionKey, items: Vec<PromoItem>, ttl: Duration) {
        // A zero TTL stores the entry already stale; lookups still go
        // through the cache, they just always miss.
        let expires_at = Instant::now()
            .checked_add(ttl)
            .unwrap_or_else(Instant::now);

        trace!(key = %key, count = items.len(), ttl_secs = ttl.as_secs(), "cache set");
        self.slots.insert(key, CacheEntry { items, expires_at });
    }

    async fn invalidate(&self, key: &SelectionKey) {
        if self.slots.remove(key).is_some() {
            trace!(key = %key, "cache slot invalidated");
        }
    }

    async fn invalidate_all(&self) {
        let dropped = self.slots.len();
        self.slots.clear();
        trace!(dropped, "all cache slots invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: u64) -> PromoItem {
        PromoItem {
            id,
            title: format!("Promo {id}"),
            content: String::new(),
            excerpt: String::new(),
            image: None,
            cta_text: None,
            cta_url: None,
            display_priority: 0,
            expiry_date: None,
            date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            modified: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn get_returns_value_until_ttl_elapses() {
        let cache = DashSelectionCache::new();
        let key = SelectionKey::Shortcode;

        cache
            .set(key, vec![item(1)], Duration::from_millis(80))
            .await;

        let hit = cache.get(&key).await.expect("fresh entry");
        assert_eq!(hit[0].id, 1);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none(), "entry past its TTL");
        assert_eq!(cache.slot_count(), 0, "stale slot dropped on read");
    }

    #[tokio::test]
    async fn zero_ttl_stores_an_immediately_stale_entry() {
        let cache = DashSelectionCache::new();
        let key = SelectionKey::AsyncLoad;

        cache.set(key, vec![item(1)], Duration::ZERO).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn set_replaces_the_previous_entry_wholesale() {
        let cache = DashSelectionCache::new();
        let key = SelectionKey::Api { limit: 3 };

        cache
            .set(key, vec![item(1), item(2)], Duration::from_secs(60))
            .await;
        cache.set(key, vec![item(9)], Duration::from_secs(60)).await;

        let items = cache.get(&key).await.unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![9]);
    }

    #[tokio::test]
    async fn invalidate_is_idempotent_on_absent_keys() {
        let cache = DashSelectionCache::new();
        let key = SelectionKey::Shortcode;

        // No entry, no error, no state change.
        cache.invalidate(&key).await;
        assert_eq!(cache.slot_count(), 0);

        cache.set(key, vec![item(1)], Duration::from_secs(60)).await;
        cache.invalidate(&key).await;
        cache.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_slot() {
        let cache = DashSelectionCache::new();
        cache
            .set(SelectionKey::Shortcode, vec![item(1)], Duration::from_secs(60))
            .await;
        cache
            .set(
                SelectionKey::Api { limit: 5 },
                vec![item(2)],
                Duration::from_secs(60),
            )
            .await;

        cache.invalidate_all().await;

        assert!(cache.get(&SelectionKey::Shortcode).await.is_none());
        assert!(cache.get(&SelectionKey::Api { limit: 5 }).await.is_none());
    }

    #[tokio::test]
    async fn unrelated_keys_are_independent() {
        let cache = DashSelectionCache::new();
        cache
            .set(SelectionKey::Shortcode, vec![item(1)], Duration::from_secs(60))
            .await;
        cache
            .set(SelectionKey::AsyncLoad, vec![item(2)], Duration::from_secs(60))
            .await;

        cache.invalidate(&SelectionKey::Shortcode).await;

        assert!(cache.get(&SelectionKey::Shortcode).await.is_none());
        assert!(cache.get(&SelectionKey::AsyncLoad).await.is_some());
    }
}
