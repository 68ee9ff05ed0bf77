use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use bytes::Bytes;
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::config::SSE_KEEPALIVE_SECS;
use crate::state::{AppState, PublishedYearMap};

pub const YEAR_MAP_EVENT: &str = "year-map";

/// Streams the year-map region: the current publication first, then every
/// accepted selection.
pub async fn year_map_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    state.observability.record_sse_connection();

    let stream = async_stream::stream! {
        // Subscribe before reading the current publication so nothing published
        // in between is missed.
        let rx = state.event_tx.subscribe();
        let current = state.year_region.read().await.published().clone();
        let mut last_revision = current.revision;
        if let Some(event) = year_map_event(&current) {
            yield Ok(event);
        }

        let mut stream = BroadcastStream::new(rx);
        while let Some(result) = stream.next().await {
            match result {
                Ok(published) => {
                    if published.revision <= last_revision {
                        continue;
                    }
                    last_revision = published.revision;
                    if let Some(event) = year_map_event(&published) {
                        yield Ok(event);
                    }
                }
                Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(
                        skipped_events = skipped,
                        "SSE client lagged behind broadcast buffer; replaying current year map"
                    );
                    let current = state.year_region.read().await.published().clone();
                    last_revision = current.revision;
                    if let Some(event) = year_map_event(&current) {
                        yield Ok(event);
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEPALIVE_SECS))
            .text("keep-alive"),
    )
}

fn year_map_event(published: &PublishedYearMap) -> Option<Event> {
    let Some(payload) = event_payload(published.payload_json.as_ref()) else {
        warn!(
            revision = published.revision,
            "year-map payload is not valid utf-8; dropping SSE event"
        );
        return None;
    };
    Some(
        Event::default()
            .id(published.revision.to_string())
            .event(YEAR_MAP_EVENT)
            .data(payload),
    )
}

fn event_payload(bytes: &Bytes) -> Option<&str> {
    std::str::from_utf8(bytes.as_ref()).ok()
}
