use crate::state::AppState;
use axum::{
    extract::State,
    http::Uri,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use promo::events::PromoEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;

#[derive(Clone, Debug)]
struct EventFilter {
    event_type: Vec<String>,
}

impl EventFilter {
    /// Parse query string with CSV support for multiple values
    /// Example: ?type=item_changed,settings_changed
    fn from_query_string(query: &str) -> Self {
        let mut event_type = Vec::new();

        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if key == "type" {
                    event_type.extend(value.split(',').map(|s| s.trim().to_string()));
                }
            }
        }

        Self { event_type }
    }

    fn matches(&self, event: &PromoEvent) -> bool {
        self.event_type.is_empty() || self.event_type.iter().any(|t| t == event.kind())
    }
}

/// GET /events
///
/// SSE stream of the invalidation traffic, mainly for observing what the
/// coordinator sees.
pub async fn stream_events(
    State(state): State<AppState>,
    uri: Uri,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let filter = uri
        .query()
        .map(EventFilter::from_query_string)
        .unwrap_or_else(|| EventFilter {
            event_type: Vec::new(),
        });

    tracing::info!(types = ?filter.event_type, "new SSE client connected");

    let rx = state.event_channel.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let filter = filter.clone();
        async move {
            match result {
                Ok(event) if filter.matches(&event) => Some(Ok(to_sse_event(event))),
                // Filtered out, or the receiver lagged; either way skip.
                _ => None,
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_sse_event(event: PromoEvent) -> Event {
    let kind = event.kind();
    let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(kind).data(data)
}
