//! TrueSignal Library
//!
//! Feed normalization, the order cache and the refresh cycle, exposed for the
//! binary and for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod feed;
pub mod refresh;
pub mod telemetry;
pub mod ui;
