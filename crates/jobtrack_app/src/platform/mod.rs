//! Native stand-in for the browser page: config, logging, rendering and the
//! message loop around the pure core.
mod app;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
