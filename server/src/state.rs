use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use worldcup_shared::{Dashboard, DashboardError, Layout, Year, YearBinding};

use crate::config::sse_broadcast_buffer;
use crate::figure::figure_json;

/// Pre-serialized year-map publication. Serialized once per accepted
/// selection, shared by the HTTP response, readers and all SSE clients.
#[derive(Debug, Clone)]
pub struct PublishedYearMap {
    pub revision: u64,
    pub year: Year,
    /// Bare plotly figure, served to graph regions.
    pub figure_json: Arc<Bytes>,
    /// `{year, revision, published_at, figure}` envelope for selections and SSE.
    pub payload_json: Arc<Bytes>,
}

impl PublishedYearMap {
    fn encode(binding: &YearBinding) -> Self {
        let figure = figure_json(&binding.output());
        let payload = serde_json::json!({
            "year": binding.selection(),
            "revision": binding.revision(),
            "published_at": Utc::now().to_rfc3339(),
            "figure": &figure,
        });
        Self {
            revision: binding.revision(),
            year: binding.selection(),
            figure_json: Arc::new(encode_json(&figure)),
            payload_json: Arc::new(encode_json(&payload)),
        }
    }
}

/// The reactive region: the year binding and what it last published.
#[derive(Debug)]
pub struct YearRegion {
    binding: YearBinding,
    published: PublishedYearMap,
}

impl YearRegion {
    pub fn new(binding: YearBinding) -> Self {
        let published = PublishedYearMap::encode(&binding);
        Self { binding, published }
    }

    /// On error nothing changes: the previous publication stays current.
    pub fn select(
        &mut self,
        dashboard: &Dashboard,
        year: Year,
    ) -> Result<PublishedYearMap, DashboardError> {
        self.binding.select(&dashboard.table, year)?;
        self.published = PublishedYearMap::encode(&self.binding);
        Ok(self.published.clone())
    }

    pub fn published(&self) -> &PublishedYearMap {
        &self.published
    }

    pub fn selection(&self) -> Year {
        self.binding.selection()
    }
}

#[derive(Debug, Clone)]
pub struct StaticFigures {
    pub winners_json: Arc<Bytes>,
    pub win_tally_json: Arc<Bytes>,
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub figures: Arc<StaticFigures>,
    pub year_region: Arc<RwLock<YearRegion>>,
    pub event_tx: broadcast::Sender<PublishedYearMap>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    selections_accepted_total: AtomicU64,
    selections_rejected_total: AtomicU64,
    figure_requests_total: AtomicU64,
    sse_connections_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub selections_accepted_total: u64,
    pub selections_rejected_total: u64,
    pub figure_requests_total: u64,
    pub sse_connections_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            selections_accepted_total: self.selections_accepted_total.load(Ordering::Relaxed),
            selections_rejected_total: self.selections_rejected_total.load(Ordering::Relaxed),
            figure_requests_total: self.figure_requests_total.load(Ordering::Relaxed),
            sse_connections_total: self.sse_connections_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_selection_accepted(&self) {
        self.selections_accepted_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_selection_rejected(&self) {
        self.selections_rejected_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_figure_request(&self) {
        self.figure_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sse_connection(&self) {
        self.sse_connections_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    /// Builds the binding at the earliest year and serializes the static
    /// figures once.
    pub fn new(dashboard: Dashboard) -> Result<Self, DashboardError> {
        let binding = YearBinding::new(&dashboard.table)?;
        let figures = StaticFigures {
            winners_json: Arc::new(encode_json(&figure_json(&dashboard.winners_map))),
            win_tally_json: Arc::new(encode_json(&figure_json(&dashboard.win_tally_map))),
        };
        let (event_tx, _) = broadcast::channel(sse_broadcast_buffer());

        Ok(Self {
            dashboard: Arc::new(dashboard),
            figures: Arc::new(figures),
            year_region: Arc::new(RwLock::new(YearRegion::new(binding))),
            event_tx,
            observability: Arc::new(ObservabilityCounters::default()),
        })
    }

    pub async fn layout(&self) -> Layout {
        let selection = self.year_region.read().await.selection();
        self.dashboard.layout(selection)
    }
}

fn encode_json(value: &serde_json::Value) -> Bytes {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .unwrap_or_else(|_| Bytes::from_static(b"null"))
}

#[cfg(test)]
pub(crate) fn sample_state() -> AppState {
    let table = worldcup_shared::load_from_reader(
        "Year,Winners,Runners_Up\n\
         1930,Uruguay,Argentina\n\
         1934,Italy,Czechoslovakia\n\
         1938,Italy,Hungary\n\
         1966,England,Germany\n"
            .as_bytes(),
    )
    .expect("sample csv");
    let dashboard = Dashboard::build(table).expect("sample dashboard");
    AppState::new(dashboard).expect("sample state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initial_publication_is_earliest_year() {
        let state = sample_state();
        let region = state.year_region.read().await;
        assert_eq!(region.selection(), 1930);
        assert_eq!(region.published().revision, 0);

        let payload: serde_json::Value =
            serde_json::from_slice(&region.published().payload_json).expect("payload json");
        assert_eq!(payload["year"], 1930);
        assert_eq!(payload["figure"]["data"][0]["locations"][0], "Uruguay");
    }

    #[tokio::test]
    async fn rejected_selection_keeps_publication() {
        let state = sample_state();
        let mut region = state.year_region.write().await;
        region
            .select(&state.dashboard, 1966)
            .expect("known year");
        let before = Arc::clone(&region.published().figure_json);

        let err = region
            .select(&state.dashboard, 1970)
            .expect_err("unknown year");

        assert!(err.is_year_not_found());
        assert_eq!(region.selection(), 1966);
        assert!(Arc::ptr_eq(&before, &region.published().figure_json));
    }
}
