//! HTTP routes for the fleet dashboards.

pub mod handlers;
pub mod pages;

use crate::fleet::FleetService;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the dashboard router. Every handler gets the fleet service as state.
pub fn build_router(fleet: Arc<FleetService>) -> Router {
    let api_routes = Router::new()
        .route("/dashboards", get(handlers::api_dashboards))
        .route("/overview", get(handlers::api_overview))
        .route("/aircraft", get(handlers::api_aircraft))
        .route("/debug/aircraft-types", get(handlers::api_aircraft_types));

    Router::new()
        .route("/", get(handlers::index))
        .route("/overview", get(handlers::overview))
        .route("/aircraft", get(handlers::aircraft))
        .route("/debug/aircraft-types", get(handlers::aircraft_types))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(fleet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtaError;
    use crate::fleet::tests::{configured, fleet_xml, FakeTransport};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn live_app(tails: &[&str]) -> Router {
        build_router(Arc::new(FleetService::new(
            configured(),
            FakeTransport::replying(&fleet_xml(tails)),
        )))
    }

    fn down_app() -> Router {
        build_router(Arc::new(FleetService::new(
            configured(),
            FakeTransport::failing(EtaError::network("dns lookup failed")),
        )))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_lists_dashboards() {
        let (status, body) = get_body(live_app(&[]), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/overview""#));
        assert!(body.contains(r#"href="/aircraft""#));
        assert!(body.contains("At-a-glance fleet summary."));
    }

    #[tokio::test]
    async fn test_overview_page_live() {
        let (status, body) = get_body(live_app(&["N102SIU", "T1", "N101SIU"]), "/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("N101SIU"));
        assert!(!body.contains("T1<"));
        assert!(!body.contains("class=\"error\""));
    }

    #[tokio::test]
    async fn test_overview_page_degraded_still_renders() {
        let (status, body) = get_body(down_app(), "/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("class=\"error\""));
        assert!(body.contains("dns lookup failed"));
        assert!(body.contains("N101SIU"));
    }

    #[tokio::test]
    async fn test_aircraft_page_is_sorted() {
        let (status, body) = get_body(live_app(&["N102SIU", "N101SIU"]), "/aircraft").await;
        assert_eq!(status, StatusCode::OK);
        let first = body.find("N101SIU").unwrap();
        let second = body.find("N102SIU").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_debug_page_has_no_stub_data() {
        let (status, body) = get_body(down_app(), "/debug/aircraft-types").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("dns lookup failed"));
        assert!(!body.contains("N101SIU"));
    }

    #[tokio::test]
    async fn test_api_overview_degraded() {
        let (status, body) = get_body(down_app(), "/api/overview").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total_aircraft"], 2);
        assert!(json["error"].as_str().unwrap().contains("dns lookup failed"));
    }

    #[tokio::test]
    async fn test_api_aircraft_types_unfiltered() {
        let (_, body) = get_body(live_app(&["N1", "T2"]), "/api/debug/aircraft-types").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["type_counts"][0]["aircraft_type"], "C172");
        assert_eq!(json["type_counts"][0]["count"], 2);
        assert!(json["error"].is_null());
    }

    #[tokio::test]
    async fn test_api_dashboards_and_health() {
        let (_, body) = get_body(live_app(&[]), "/api/dashboards").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json[1]["path"], "/aircraft");

        let (status, body) = get_body(live_app(&[]), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["credentials_configured"], true);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get_body(live_app(&[]), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
