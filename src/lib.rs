pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod fleet;
pub mod logging;
pub mod models;
pub mod ui;
pub mod web;

pub use error::EtaError;
