use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use promo::domain::{PromoDraft, PromoItem};
use promo::ports::ContentStore;
use shared::Result;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory content store modeling the external persistence layer.
///
/// Query results come back the way a real store would hand them out:
/// published items only, pre-filtered on expiry, sorted by priority then
/// recency descending, capped server-side.
pub struct MemoryContentStore {
    items: DashMap<u64, PromoItem>,
    next_id: AtomicU64,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates an item from a draft, assigning its id and timestamps.
    pub fn insert(&self, draft: PromoDraft) -> PromoItem {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let item = PromoItem {
            id,
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            image: draft.image,
            cta_text: draft.cta_text,
            cta_url: draft.cta_url,
            display_priority: draft.display_priority,
            expiry_date: draft.expiry_date,
            date: now,
            modified: now,
        };
        self.items.insert(id, item.clone());
        item
    }

    /// Replaces an item's editable fields, preserving its identity and
    /// creation date and bumping `modified`.
    pub fn update(&self, id: u64, draft: PromoDraft) -> Option<PromoItem> {
        let mut entry = self.items.get_mut(&id)?;
        entry.title = draft.title;
        entry.content = draft.content;
        entry.excerpt = draft.excerpt;
        entry.image = draft.image;
        entry.cta_text = draft.cta_text;
        entry.cta_url = draft.cta_url;
        entry.display_priority = draft.display_priority;
        entry.expiry_date = draft.expiry_date;
        entry.modified = Utc::now();
        Some(entry.clone())
    }

    pub fn remove(&self, id: u64) -> bool {
        self.items.remove(&id).is_some()
    }

    pub fn get(&self, id: u64) -> Option<PromoItem> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn query_candidates(&self, today: NaiveDate, max_count: usize) -> Result<Vec<PromoItem>> {
        let mut candidates: Vec<PromoItem> = self
            .items
            .iter()
            .filter(|entry| entry.is_active(today))
            .map(|entry| entry.value().clone())
            .collect();

        candidates.sort_by(|a, b| {
            b.display_priority
                .cmp(&a.display_priority)
                .then_with(|| b.date.cmp(&a.date))
                .then_with(|| b.id.cmp(&a.id))
        });
        candidates.truncate(max_count);
        Ok(candidates)
    }

    async fn expired_between(&self, since: NaiveDate, until: NaiveDate) -> Result<Vec<u64>> {
        Ok(self
            .items
            .iter()
            .filter_map(|entry| match entry.expiry_date {
                Some(expiry) if expiry >= since && expiry < until => Some(entry.id),
                _ => None,
            })
            .collect())
    }
}
