//! Dashboard page and JSON handlers

use crate::dashboard::{
    load_fleet, load_type_diagnostics, AircraftStatus, DashboardLink, Overview,
    TypeDiagnostics, DASHBOARDS,
};
use crate::fleet::FleetService;
use crate::web::pages;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub eta_base_url: String,
    pub credentials_configured: bool,
}

/// GET /
pub async fn index(State(fleet): State<Arc<FleetService>>) -> Html<String> {
    Html(pages::index(DASHBOARDS, &fleet.config().location))
}

/// GET /overview
pub async fn overview(State(fleet): State<Arc<FleetService>>) -> Html<String> {
    let outcome = load_fleet(&fleet).await;
    Html(pages::overview(&Overview::from_outcome(&outcome)))
}

/// GET /aircraft
pub async fn aircraft(State(fleet): State<Arc<FleetService>>) -> Html<String> {
    let outcome = load_fleet(&fleet).await;
    Html(pages::aircraft(&AircraftStatus::from_outcome(&outcome)))
}

/// GET /debug/aircraft-types
pub async fn aircraft_types(State(fleet): State<Arc<FleetService>>) -> Html<String> {
    Html(pages::aircraft_types(&load_type_diagnostics(&fleet).await))
}

/// GET /api/dashboards
pub async fn api_dashboards() -> Json<&'static [DashboardLink]> {
    Json(DASHBOARDS)
}

/// GET /api/overview
pub async fn api_overview(State(fleet): State<Arc<FleetService>>) -> Json<Overview> {
    Json(Overview::from_outcome(&load_fleet(&fleet).await))
}

/// GET /api/aircraft
pub async fn api_aircraft(State(fleet): State<Arc<FleetService>>) -> Json<AircraftStatus> {
    Json(AircraftStatus::from_outcome(&load_fleet(&fleet).await))
}

/// GET /api/debug/aircraft-types
pub async fn api_aircraft_types(State(fleet): State<Arc<FleetService>>) -> Json<TypeDiagnostics> {
    Json(load_type_diagnostics(&fleet).await)
}

/// GET /health
///
/// Does not call ETA; only reports whether the static configuration is usable.
pub async fn health(State(fleet): State<Arc<FleetService>>) -> Json<HealthResponse> {
    let credentials_configured = fleet.config().credentials().is_ok();
    Json(HealthResponse {
        status: if credentials_configured {
            "ok"
        } else {
            "misconfigured"
        },
        eta_base_url: fleet.config().base_url().to_string(),
        credentials_configured,
    })
}
