//! The fleet service: the one place dashboards get aircraft from.
//!
//! [`FleetService`] resolves credentials, asks the transport for the ETA
//! `aircraft` export, parses it, and applies the reporting filters. It does
//! not fall back to placeholder data; that policy belongs to the dashboard
//! aggregator in [`crate::dashboard`].

use crate::api::{build_request_xml, EtaTransport};
use crate::config::EtaConfig;
use crate::error::EtaError;
use crate::models::{parse_aircraft_xml, AircraftRecord};
use std::sync::Arc;
use tracing::{debug, info};

pub const AIRCRAFT_OPERATION: &str = "aircraft";

/// Restricts the export to aircraft ETA considers active.
pub const ACTIVE_STATUS_PARAM: (&str, Option<&str>) = ("aircraftstatus", Some("Active"));

#[derive(Clone)]
pub struct FleetService {
    config: EtaConfig,
    transport: Arc<dyn EtaTransport>,
}

impl FleetService {
    pub fn new(config: EtaConfig, transport: Arc<dyn EtaTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &EtaConfig {
        &self.config
    }

    /// Unfiltered aircraft list straight from ETA.
    ///
    /// Meant for diagnostics only; dashboards should use
    /// [`fetch_fleet_summary`](Self::fetch_fleet_summary).
    pub async fn fetch_raw_fleet(&self) -> Result<Vec<AircraftRecord>, EtaError> {
        let base_url = self.config.base_url();
        let creds = self.config.credentials()?;

        let xml = build_request_xml(AIRCRAFT_OPERATION, &creds, &[ACTIVE_STATUS_PARAM]);
        let body = self.transport.fetch(base_url, &xml).await?;
        let aircraft = parse_aircraft_xml(&body)?;

        debug!("ETA returned {} aircraft records", aircraft.len());
        Ok(aircraft)
    }

    /// The filtered fleet every dashboard reports on. Not sorted.
    pub async fn fetch_fleet_summary(&self) -> Result<Vec<AircraftRecord>, EtaError> {
        let raw = self.fetch_raw_fleet().await?;
        let total = raw.len();

        let summary: Vec<AircraftRecord> = raw
            .into_iter()
            .filter(|a| is_reportable_tail(&a.tail))
            .collect();

        info!("Fleet summary: {} of {} aircraft reportable", summary.len(), total);
        Ok(summary)
    }
}

/// Whether a tail belongs in the dashboards.
///
/// Blank tails are dropped, and so is anything starting with `T`
/// (case-insensitive). The `T` rule is operator policy.
pub fn is_reportable_tail(tail: &str) -> bool {
    let tail = tail.trim();
    !tail.is_empty() && !tail.to_uppercase().starts_with('T')
}
