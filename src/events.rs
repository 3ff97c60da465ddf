//! Event types and the main event loop driver for the fleet terminal dashboard.
//!
//! This module defines the [`Event`] enum (keyboard input, ticks and fleet
//! snapshots) and the [`EventHandler`], which runs a background task that
//! polls crossterm for key events and emits periodic [`Event::Tick`]s.
//! The main loop in `fleet_tui.rs` receives events via [`EventHandler::next`]
//! and the ETA poller sends snapshots via [`EventHandler::tx`].

use crate::app::FleetSnapshot;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::error;

/// Events processed by the application event loop.
pub enum Event {
    /// Periodic tick used for UI refresh.
    Tick,
    /// User key press from the terminal.
    Input(KeyEvent),
    /// A fresh fetch from ETA, live or degraded.
    FleetUpdate(Box<FleetSnapshot>),
}

/// Multiplexes terminal input, ticks and fleet snapshots into a single
/// event stream.
///
/// The sender ([`tx`](EventHandler::tx)) can be cloned and handed to the
/// poller task, while the receiver is consumed by
/// [`next`](EventHandler::next) in the main loop.
pub struct EventHandler {
    /// Sender for posting events (e.g. from the ETA poller).
    pub tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates a new event handler and spawns the input/tick task.
    ///
    /// The spawned task polls crossterm with a timeout of `tick_rate_ms`;
    /// a key press becomes [`Event::Input`] and each elapsed interval an
    /// [`Event::Tick`]. If the terminal stops answering the task logs the
    /// error and exits, after which only poller events arrive.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::from_secs(0));

                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) => {
                            event_tx.send(Event::Input(key)).ok();
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Terminal read failed: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        error!("Terminal poll failed: {}", e);
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    event_tx.send(Event::Tick).ok();
                    last_tick = Instant::now();
                }
            }
        });

        Self { tx, rx }
    }

    /// Receives the next event from the channel.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
