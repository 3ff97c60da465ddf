//! Dashboard aggregates shared by the web pages and the terminal UI.
//!
//! This is where a failed ETA fetch turns into placeholder data: the
//! [`load_fleet`] aggregator never fails, it returns a [`FleetOutcome`]
//! that is either live or degraded with a reason to show the user.

use crate::fleet::FleetService;
use crate::models::{placeholder_fleet, AircraftRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, warn};

/// Most aircraft listed on the overview page.
pub const OVERVIEW_SAMPLE_SIZE: usize = 12;

/// Type label for aircraft with no type on the overview.
pub const UNTYPED_LABEL: &str = "-";

/// Type label for aircraft with no type on the diagnostics page.
pub const BLANK_TYPE_LABEL: &str = "(blank)";

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DashboardLink {
    pub name: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

pub const DASHBOARDS: &[DashboardLink] = &[
    DashboardLink {
        name: "Overview",
        path: "/overview",
        description: "At-a-glance fleet summary.",
    },
    DashboardLink {
        name: "Aircraft Status",
        path: "/aircraft",
        description: "Tail, aircraft type, Hobbs.",
    },
];

/// Result of loading the reportable fleet.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetOutcome {
    /// ETA answered; the fleet is real.
    Live(Vec<AircraftRecord>),
    /// ETA failed; `aircraft` is placeholder data.
    Degraded {
        aircraft: Vec<AircraftRecord>,
        reason: String,
    },
}

impl FleetOutcome {
    pub fn aircraft(&self) -> &[AircraftRecord] {
        match self {
            Self::Live(aircraft) | Self::Degraded { aircraft, .. } => aircraft,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Live(_) => None,
            Self::Degraded { reason, .. } => Some(reason.as_str()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Loads the reportable fleet, sorted by tail, substituting placeholder
/// aircraft if anything goes wrong.
pub async fn load_fleet(service: &FleetService) -> FleetOutcome {
    let mut outcome = match service.fetch_fleet_summary().await {
        Ok(aircraft) => FleetOutcome::Live(aircraft),
        Err(e) => {
            error!("ETA aircraft summary failed: {}", e);
            warn!("Using placeholder fleet");
            FleetOutcome::Degraded {
                aircraft: placeholder_fleet(),
                reason: e.to_string(),
            }
        }
    };

    match &mut outcome {
        FleetOutcome::Live(aircraft) | FleetOutcome::Degraded { aircraft, .. } => {
            sort_by_tail(aircraft)
        }
    }
    outcome
}

pub fn sort_by_tail(aircraft: &mut [AircraftRecord]) {
    aircraft.sort_by(|a, b| a.tail.cmp(&b.tail));
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TypeCount {
    pub aircraft_type: String,
    pub count: usize,
}

/// Counts aircraft per type, alphabetically by type. Blank types are
/// counted under `blank_label`.
pub fn type_breakdown(aircraft: &[AircraftRecord], blank_label: &str) -> Vec<TypeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for a in aircraft {
        let key = if a.aircraft_type.is_empty() {
            blank_label
        } else {
            a.aircraft_type.as_str()
        };
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(aircraft_type, count)| TypeCount {
            aircraft_type: aircraft_type.to_string(),
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Overview {
    pub total_aircraft: usize,
    pub total_hobbs: f64,
    pub type_breakdown: Vec<TypeCount>,
    pub sample_aircraft: Vec<AircraftRecord>,
    pub error: Option<String>,
}

impl Overview {
    pub fn from_outcome(outcome: &FleetOutcome) -> Self {
        let aircraft = outcome.aircraft();
        Self {
            total_aircraft: aircraft.len(),
            total_hobbs: aircraft.iter().map(|a| a.hobbs).sum(),
            type_breakdown: type_breakdown(aircraft, UNTYPED_LABEL),
            sample_aircraft: aircraft.iter().take(OVERVIEW_SAMPLE_SIZE).cloned().collect(),
            error: outcome.error().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AircraftStatus {
    pub aircraft: Vec<AircraftRecord>,
    pub error: Option<String>,
}

impl AircraftStatus {
    pub fn from_outcome(outcome: &FleetOutcome) -> Self {
        Self {
            aircraft: outcome.aircraft().to_vec(),
            error: outcome.error().map(str::to_string),
        }
    }
}

/// Type counts over the unfiltered ETA export.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TypeDiagnostics {
    pub type_counts: Vec<TypeCount>,
    pub error: Option<String>,
}

/// Builds the type diagnostics from the raw export. On failure the error
/// is reported as-is with no placeholder data.
pub async fn load_type_diagnostics(service: &FleetService) -> TypeDiagnostics {
    match service.fetch_raw_fleet().await {
        Ok(aircraft) => TypeDiagnostics {
            type_counts: type_breakdown(&aircraft, BLANK_TYPE_LABEL),
            error: None,
        },
        Err(e) => {
            error!("ETA raw aircraft fetch failed: {}", e);
            TypeDiagnostics {
                type_counts: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtaError;
    use crate::fleet::tests::{configured, fleet_xml, FakeTransport};

    fn live(tails: &[&str]) -> FleetService {
        FleetService::new(configured(), FakeTransport::replying(&fleet_xml(tails)))
    }

    fn down() -> FleetService {
        FleetService::new(
            configured(),
            FakeTransport::failing(EtaError::network("connection refused")),
        )
    }

    #[tokio::test]
    async fn test_load_fleet_sorts_by_tail() {
        let outcome = load_fleet(&live(&["N102SIU", "N101SIU"])).await;
        let tails: Vec<&str> = outcome.aircraft().iter().map(|a| a.tail.as_str()).collect();
        assert_eq!(tails, ["N101SIU", "N102SIU"]);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.error(), None);
    }

    #[tokio::test]
    async fn test_load_fleet_degrades_to_placeholders() {
        let outcome = load_fleet(&down()).await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.aircraft(), placeholder_fleet().as_slice());
        assert_eq!(outcome.error(), Some("ETA request failed: connection refused"));
    }

    #[tokio::test]
    async fn test_overview_survives_network_failure() {
        let overview = Overview::from_outcome(&load_fleet(&down()).await);
        assert_eq!(overview.total_aircraft, 2);
        assert!((overview.total_hobbs - 2214.7).abs() < 1e-9);
        assert_eq!(
            overview.type_breakdown,
            [TypeCount {
                aircraft_type: "C172".to_string(),
                count: 2
            }]
        );
        assert!(!overview.error.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_overview_with_missing_credentials() {
        let mut config = configured();
        config.customer_code.clear();
        let service = FleetService::new(config, FakeTransport::replying(&fleet_xml(&["N1"])));

        let overview = Overview::from_outcome(&load_fleet(&service).await);
        assert_eq!(overview.total_aircraft, 2);
        assert_eq!(
            overview.error.as_deref(),
            Some("missing ETA credentials: customercode")
        );
    }

    #[test]
    fn test_overview_sample_is_capped() {
        let aircraft: Vec<AircraftRecord> = (0..20)
            .map(|i| AircraftRecord::new(&format!("N{i:03}"), "", 1.0))
            .collect();
        let overview = Overview::from_outcome(&FleetOutcome::Live(aircraft));

        assert_eq!(overview.total_aircraft, 20);
        assert_eq!(overview.sample_aircraft.len(), OVERVIEW_SAMPLE_SIZE);
        assert_eq!(overview.sample_aircraft[0].tail, "N000");
        assert_eq!(overview.type_breakdown[0].aircraft_type, UNTYPED_LABEL);
        assert_eq!(overview.type_breakdown[0].count, 20);
    }

    #[test]
    fn test_type_breakdown_is_alphabetical() {
        let aircraft = vec![
            AircraftRecord::new("N1", "PA28", 0.0),
            AircraftRecord::new("N2", "C172", 0.0),
            AircraftRecord::new("N3", "", 0.0),
            AircraftRecord::new("N4", "C172", 0.0),
        ];
        let counts: Vec<(String, usize)> = type_breakdown(&aircraft, BLANK_TYPE_LABEL)
            .into_iter()
            .map(|t| (t.aircraft_type, t.count))
            .collect();
        assert_eq!(
            counts,
            [
                ("(blank)".to_string(), 1),
                ("C172".to_string(), 2),
                ("PA28".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_sort_puts_empty_tail_first() {
        let mut aircraft = vec![
            AircraftRecord::new("n1", "", 0.0),
            AircraftRecord::new("N1", "", 0.0),
            AircraftRecord::new("", "", 0.0),
        ];
        sort_by_tail(&mut aircraft);
        let tails: Vec<&str> = aircraft.iter().map(|a| a.tail.as_str()).collect();
        assert_eq!(tails, ["", "N1", "n1"]);
    }

    #[tokio::test]
    async fn test_type_diagnostics_are_unfiltered() {
        let diag = load_type_diagnostics(&live(&["N1", "T100", ""])).await;
        assert_eq!(diag.error, None);
        assert_eq!(
            diag.type_counts,
            [TypeCount {
                aircraft_type: "C172".to_string(),
                count: 3
            }]
        );
    }

    #[tokio::test]
    async fn test_type_diagnostics_report_errors_without_stub() {
        let diag = load_type_diagnostics(&down()).await;
        assert!(diag.type_counts.is_empty());
        assert_eq!(
            diag.error.as_deref(),
            Some("ETA request failed: connection refused")
        );
    }
}
