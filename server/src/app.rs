use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::page::index))
        .route("/api/layout", get(routes::api::get_layout))
        .route("/api/charts/winners", get(routes::api::get_winners_figure))
        .route("/api/charts/wins", get(routes::api::get_win_tally_figure))
        .route("/api/charts/year", get(routes::api::get_year_figure))
        .route("/api/selection", post(routes::api::post_selection))
        .route("/api/events", get(routes::sse::year_map_events))
        .route("/api/health", get(routes::api::health))
        .route("/api/metrics", get(routes::api::metrics))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
pub(crate) async fn spawn_test_server(
    state: AppState,
) -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let app = build_app(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    (addr, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sample_state;

    #[tokio::test]
    async fn layout_endpoint_describes_component_tree_and_binding() {
        let (addr, server_handle) = spawn_test_server(sample_state()).await;

        let layout = reqwest::Client::new()
            .get(format!("http://{addr}/api/layout"))
            .send()
            .await
            .expect("layout request")
            .error_for_status()
            .expect("layout status")
            .json::<serde_json::Value>()
            .await
            .expect("parse layout");

        assert_eq!(layout["title"], "World Cup Data");
        assert_eq!(layout["bindings"][0]["input_id"], "world-cup-year");
        assert_eq!(layout["bindings"][0]["output_property"], "figure");
        let slider = &layout["children"][9]["children"][1];
        assert_eq!(slider["component"], "slider");
        assert_eq!(slider["min"], 1930);
        assert_eq!(slider["max"], 1966);
        assert_eq!(slider["value"], 1930);
        assert_eq!(slider["marks"][3]["label"], "1966");

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (addr, server_handle) = spawn_test_server(sample_state()).await;

        let response = reqwest::get(format!("http://{addr}/api/history"))
            .await
            .expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        server_handle.abort();
        let _ = server_handle.await;
    }
}
