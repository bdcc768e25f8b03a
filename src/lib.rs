pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod types;

// Use cases and the ports they depend on; concrete adapters live in infra
pub mod app;
pub mod infra;
