use crate::dashboard::{
    load_fleet, load_type_diagnostics, AircraftStatus, Overview, TypeDiagnostics,
};
use crate::fleet::FleetService;
use crate::models::AircraftRecord;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

/// Everything the terminal dashboard shows, from one refresh.
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub overview: Overview,
    pub status: AircraftStatus,
    pub types: TypeDiagnostics,
    pub fetched_at: DateTime<Local>,
}

impl FleetSnapshot {
    /// Fetches the summary and the raw export. Never fails; errors are
    /// carried in the aggregates.
    pub async fn fetch(service: &FleetService) -> Self {
        let outcome = load_fleet(service).await;
        let types = load_type_diagnostics(service).await;

        Self {
            overview: Overview::from_outcome(&outcome),
            status: AircraftStatus::from_outcome(&outcome),
            types,
            fetched_at: Local::now(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error.as_deref()
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum ViewMode {
    #[default]
    Overview,
    Aircraft,
    Types,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Overview, ViewMode::Aircraft, ViewMode::Types];

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Overview => "Overview",
            ViewMode::Aircraft => "Aircraft Status",
            ViewMode::Types => "Aircraft Types",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ViewMode::Overview => 0,
            ViewMode::Aircraft => 1,
            ViewMode::Types => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Default)]
pub struct App {
    pub view_mode: ViewMode,
    pub snapshot: Option<FleetSnapshot>,
    pub selected_index: usize,
    pub tick_count: usize,
    pub should_quit: bool,

    // Set by 'r'; the main loop wakes the poller and clears it.
    pub refresh_requested: bool,
    pub refreshing: bool,

    pub location: String,
    pub poll_interval_seconds: u64,
}

impl App {
    pub fn new(location: &str, poll_interval_seconds: u64) -> Self {
        Self {
            location: location.to_string(),
            poll_interval_seconds,
            refreshing: true,
            ..Self::default()
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_count += 1;
    }

    /// The sorted, reportable fleet from the latest snapshot.
    pub fn aircraft(&self) -> &[AircraftRecord] {
        self.snapshot
            .as_ref()
            .map(|s| s.status.aircraft.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<&AircraftRecord> {
        self.aircraft().get(self.selected_index)
    }

    pub fn apply_snapshot(&mut self, snapshot: FleetSnapshot) {
        let len = snapshot.status.aircraft.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        self.snapshot = Some(snapshot);
        self.refreshing = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') => self.view_mode = ViewMode::Overview,
            KeyCode::Char('2') => self.view_mode = ViewMode::Aircraft,
            KeyCode::Char('3') => self.view_mode = ViewMode::Types,
            KeyCode::Tab => self.view_mode = self.view_mode.next(),
            KeyCode::Char('r') => {
                if !self.refreshing {
                    self.refresh_requested = true;
                    self.refreshing = true;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.aircraft().len();
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.aircraft().len();
                if len > 0 {
                    self.selected_index = self.selected_index.checked_sub(1).unwrap_or(len - 1);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dashboard::FleetOutcome;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn snapshot(outcome: FleetOutcome) -> FleetSnapshot {
        FleetSnapshot {
            overview: Overview::from_outcome(&outcome),
            status: AircraftStatus::from_outcome(&outcome),
            types: TypeDiagnostics {
                type_counts: crate::dashboard::type_breakdown(outcome.aircraft(), "(blank)"),
                error: outcome.error().map(str::to_string),
            },
            fetched_at: Local::now(),
        }
    }

    fn fleet(tails: &[&str]) -> FleetSnapshot {
        snapshot(FleetOutcome::Live(
            tails
                .iter()
                .map(|t| AircraftRecord::new(t, "C172", 1.0))
                .collect(),
        ))
    }

    #[test]
    fn test_view_switching() {
        let mut app = App::new("", 60);
        assert_eq!(app.view_mode, ViewMode::Overview);

        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.view_mode, ViewMode::Types);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view_mode, ViewMode::Overview);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view_mode, ViewMode::Aircraft);
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = App::new("", 60);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_index, 0);

        app.apply_snapshot(fleet(&["N1", "N2", "N3"]));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected().unwrap().tail, "N3");
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected().unwrap().tail, "N1");
    }

    #[test]
    fn test_selection_clamped_when_fleet_shrinks() {
        let mut app = App::new("", 60);
        app.apply_snapshot(fleet(&["N1", "N2", "N3"]));
        app.selected_index = 2;
        app.apply_snapshot(fleet(&["N1"]));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_refresh_request_is_debounced() {
        let mut app = App::new("", 60);
        app.apply_snapshot(fleet(&["N1"]));
        assert!(!app.refreshing);

        app.handle_key(key(KeyCode::Char('r')));
        assert!(app.refresh_requested);
        app.refresh_requested = false;
        app.handle_key(key(KeyCode::Char('r')));
        assert!(!app.refresh_requested);

        app.apply_snapshot(fleet(&["N1"]));
        assert!(!app.refreshing);
    }

    #[test]
    fn test_quit() {
        let mut app = App::new("", 60);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
