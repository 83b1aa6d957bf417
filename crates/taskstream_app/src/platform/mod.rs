mod app;
mod cli;
mod config;
mod effects;
mod host;
mod timer;
mod ui;

pub use app::run_app;
