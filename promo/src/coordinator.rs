use crate::events::PromoEvent;
use crate::ports::{ContentStore, SelectionCache};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Wires mutation events and the periodic expiry sweep to cache
/// invalidation.
///
/// Invalidation is best-effort and idempotent; the TTL on each cache entry
/// remains the hard staleness bound, the coordinator only tightens it.
pub struct InvalidationCoordinator {
    cache: Arc<dyn SelectionCache>,
    store: Arc<dyn ContentStore>,
    sweeper_scheduled: AtomicBool,
}

impl InvalidationCoordinator {
    pub fn new(cache: Arc<dyn SelectionCache>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            cache,
            store,
            sweeper_scheduled: AtomicBool::new(false),
        }
    }

    /// Applies the invalidation action for one event. Priority or expiry
    /// edits can reorder any view, so an item change drops every slot, the
    /// same as a settings change or an explicit flush.
    pub async fn handle_event(&self, event: &PromoEvent) {
        match event {
            PromoEvent::ItemChanged(e) => {
                debug!(item_id = e.id, "item changed, invalidating all selection slots");
                self.cache.invalidate_all().await;
            }
            PromoEvent::SettingsChanged(_) => {
                debug!("settings changed, invalidating all selection slots");
                self.cache.invalidate_all().await;
            }
            PromoEvent::CacheClearRequested(_) => {
                info!("manual cache clear requested");
                self.cache.invalidate_all().await;
            }
        }
    }

    /// Consumes the event bus until every sender is dropped. A lagged
    /// receiver just means missed events; flushing everything on the next
    /// one keeps the cache safe regardless.
    pub fn spawn_consumer(
        self: &Arc<Self>,
        mut rx: broadcast::Receiver<PromoEvent>,
    ) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => coordinator.handle_event(&event).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "invalidation consumer lagged, flushing cache");
                        coordinator.cache.invalidate_all().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("event bus closed, stopping invalidation consumer");
                        break;
                    }
                }
            }
        })
    }

    /// One sweep pass: if any item's expiry date fell inside
    /// `[since, until)`, a cached selection may still be showing it, so
    /// every slot is dropped. Returns how many items crossed the boundary.
    pub async fn sweep_window(&self, since: NaiveDate, until: NaiveDate) -> shared::Result<usize> {
        let expired = self.store.expired_between(since, until).await?;
        if !expired.is_empty() {
            debug!(
                expired = expired.len(),
                %since,
                %until,
                "items crossed their expiry date, invalidating all selection slots"
            );
            self.cache.invalidate_all().await;
        }
        Ok(expired.len())
    }

    /// Schedules the recurring expiry sweep. Idempotent: only the first
    /// call spawns a task, repeated init returns `None`.
    ///
    /// A failed pass is logged and retried next tick; if the task dies
    /// entirely the staleness bound degrades gracefully to the entry TTL.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> Option<JoinHandle<()>> {
        if self
            .sweeper_scheduled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("expiry sweeper already scheduled, skipping");
            return None;
        }

        let coordinator = Arc::clone(self);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last_sweep = Utc::now().date_naive();

            info!(interval_secs = interval.as_secs(), "expiry sweeper scheduled");

            loop {
                ticker.tick().await;
                let today = Utc::now().date_naive();
                match coordinator.sweep_window(last_sweep, today).await {
                    Ok(_) => last_sweep = today,
                    Err(e) => {
                        // Keep the old window so the next pass re-covers it.
                        warn!(error = %e, "expiry sweep failed, will retry next tick");
                    }
                }
            }
        }))
    }
}

impl std::fmt::Debug for InvalidationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationCoordinator")
            .field("sweeper_scheduled", &self.sweeper_scheduled.load(Ordering::SeqCst))
            .finish()
    }
}
