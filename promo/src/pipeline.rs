use crate::domain::{PromoItem, SelectionKey, Settings};
use crate::ports::{ContentStore, SelectionCache};
use crate::selector;
use chrono::{DateTime, Utc};
use shared::Result;
use std::sync::Arc;
use tracing::debug;

/// The one selection-via-cache path every surface goes through.
///
/// Lookup order: cache slot for the key, then on a miss the content store,
/// the pure selector, and a cache write with the configured TTL. Keeping
/// all three surfaces on this single path is what guarantees they can
/// never disagree about which items are active.
#[derive(Clone)]
pub struct SelectionService {
    store: Arc<dyn ContentStore>,
    cache: Arc<dyn SelectionCache>,
}

impl SelectionService {
    pub fn new(store: Arc<dyn ContentStore>, cache: Arc<dyn SelectionCache>) -> Self {
        Self { store, cache }
    }

    /// Returns the selection for one view. Feature gating happens in the
    /// adapters; by the time this runs the caller has decided the view
    /// should show content.
    ///
    /// A store failure propagates without writing a cache entry, so the
    /// next request retries the store naturally.
    pub async fn selection(
        &self,
        key: SelectionKey,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<Vec<PromoItem>> {
        if let Some(items) = self.cache.get(&key).await {
            debug!(key = %key, count = items.len(), "selection cache hit");
            return Ok(items);
        }

        let cap = match key {
            SelectionKey::Api { limit } => limit,
            SelectionKey::Shortcode | SelectionKey::AsyncLoad => settings.max_blocks,
        };

        let candidates = self.store.query_candidates(now.date_naive(), cap).await?;
        let selected = selector::select(&candidates, cap, now);

        debug!(
            key = %key,
            candidates = candidates.len(),
            selected = selected.len(),
            "selection computed from store"
        );

        self.cache
            .set(key, selected.clone(), settings.cache_ttl().as_duration())
            .await;

        Ok(selected)
    }
}

impl std::fmt::Debug for SelectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionService").finish_non_exhaustive()
    }
}
