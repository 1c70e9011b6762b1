//! Metric types

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct IterationMetrics {
    pub started: usize,
    pub completed: usize,
    pub rescheduled: usize,
    pub in_flight: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestMetrics {
    pub iterations: IterationMetrics,
    pub system: SystemMetrics,
}

/// Statistics bucket: request method plus named endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EndpointKey {
    pub method: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct FailureKey {
    pub endpoint: EndpointKey,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointStats {
    pub method: String,
    pub name: String,
    pub requests: u64,
    pub failures: u64,
    /// Milliseconds
    pub latency: LatencyStats,
}

impl EndpointStats {
    pub fn failure_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failures as f64 / self.requests as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub method: String,
    pub name: String,
    pub message: String,
    pub occurrences: u64,
}

/// Everything the final report and the JSON summary are built from
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub elapsed_secs: u64,
    pub iterations: IterationMetrics,
    pub endpoints: Vec<EndpointStats>,
    pub total: EndpointStats,
    pub failures: Vec<FailureEntry>,
}
