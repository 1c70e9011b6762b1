// Metrics module
// Per-endpoint request statistics, iteration counters and console reporting

pub mod collector;
pub mod reporter;
pub mod types;

pub use collector::MetricsCollector;
