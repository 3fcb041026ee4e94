use cache_store::{DashSelectionCache, MemoryContentStore};
use promo::coordinator::InvalidationCoordinator;
use promo::domain::Settings;
use promo::events::PromoEvent;
use promo::pipeline::SelectionService;
use promo::ports::{ContentStore, PromoRenderer, SelectionCache};
use promo::tokens::TokenStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

use crate::render::HtmlRenderer;

/// Server state shared across handlers. Every component is constructed
/// here and passed by reference; nothing reads ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryContentStore>,
    pub cache: Arc<DashSelectionCache>,
    pub selection: SelectionService,
    pub coordinator: Arc<InvalidationCoordinator>,
    pub settings: Arc<RwLock<Settings>>,
    pub event_channel: broadcast::Sender<PromoEvent>,
    pub tokens: Arc<TokenStore>,
    pub renderer: Arc<dyn PromoRenderer>,
}

impl AppState {
    /// Wires the pipeline: content store and cache behind their ports, one
    /// selection service in front of them, and the invalidation consumer
    /// subscribed to the event bus before any request can mutate state.
    pub fn new(token_ttl: Duration) -> Self {
        let store = Arc::new(MemoryContentStore::new());
        let cache = Arc::new(DashSelectionCache::new());

        let selection = SelectionService::new(
            store.clone() as Arc<dyn ContentStore>,
            cache.clone() as Arc<dyn SelectionCache>,
        );

        let coordinator = Arc::new(InvalidationCoordinator::new(
            cache.clone() as Arc<dyn SelectionCache>,
            store.clone() as Arc<dyn ContentStore>,
        ));

        // Broadcast channel for invalidation and SSE observers.
        let (event_tx, event_rx) = broadcast::channel(1000);
        let _consumer = coordinator.spawn_consumer(event_rx);

        Self {
            store,
            cache,
            selection,
            coordinator,
            settings: Arc::new(RwLock::new(Settings::default())),
            event_channel: event_tx,
            tokens: Arc::new(TokenStore::new(token_ttl)),
            renderer: Arc::new(HtmlRenderer),
        }
    }

    /// Current settings snapshot. Settings are copied out so handlers never
    /// hold the lock across an await.
    pub async fn settings_snapshot(&self) -> Settings {
        *self.settings.read().await
    }

    /// Publishes an event to the bus. A send error only means nobody is
    /// subscribed, which cannot happen while the invalidation consumer
    /// lives; log it rather than fail the request.
    pub fn publish(&self, event: PromoEvent) {
        let kind = event.kind();
        match self.event_channel.send(event) {
            Ok(subscriber_count) => {
                tracing::debug!(kind, subscriber_count, "published event");
            }
            Err(_) => {
                tracing::warn!(kind, "no subscribers for event");
            }
        }
    }
}
