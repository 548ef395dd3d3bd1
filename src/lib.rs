// The binary entry point is main.rs; the library holds everything else so
// integration tests and criterion benches can reach it as `vocadrill::*`.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod session;
pub mod speech;
pub mod store;
pub mod ui;
