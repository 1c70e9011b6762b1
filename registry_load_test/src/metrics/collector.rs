//! Metrics collector - thread-safe collection with per-endpoint latency tracking

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use reqwest::Method;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use super::types::{
    EndpointKey, EndpointStats, FailureEntry, FailureKey, LatencyStats, Summary, TestMetrics,
};

/// Name of the row that aggregates every endpoint
pub const AGGREGATED: &str = "Aggregated";

struct EndpointRecord {
    requests: u64,
    failures: u64,
    latencies: Histogram<u64>,
}

impl EndpointRecord {
    fn new() -> Self {
        Self {
            requests: 0,
            failures: 0,
            // 3 significant digits, auto-resizing
            latencies: Histogram::new(3).expect("Failed to create latency histogram"),
        }
    }

    fn record(&mut self, elapsed: Duration, failed: bool) {
        self.requests += 1;
        if failed {
            self.failures += 1;
        }
        self.latencies.saturating_record(elapsed.as_millis() as u64);
    }

    fn stats(&self, method: &str, name: &str) -> EndpointStats {
        EndpointStats {
            method: method.to_string(),
            name: name.to_string(),
            requests: self.requests,
            failures: self.failures,
            latency: latency_stats(&self.latencies),
        }
    }
}

fn latency_stats(hist: &Histogram<u64>) -> LatencyStats {
    if hist.len() == 0 {
        return LatencyStats::default();
    }
    LatencyStats {
        min: hist.min(),
        p50: hist.value_at_quantile(0.50),
        p95: hist.value_at_quantile(0.95),
        p99: hist.value_at_quantile(0.99),
        max: hist.max(),
        mean: hist.mean(),
        count: hist.len(),
    }
}

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TestMetrics>>,
    endpoints: Arc<RwLock<BTreeMap<EndpointKey, EndpointRecord>>>,
    total: Arc<RwLock<EndpointRecord>>,
    failures: Arc<RwLock<BTreeMap<FailureKey, u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // Initialize system monitor
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TestMetrics::default())),
            endpoints: Arc::new(RwLock::new(BTreeMap::new())),
            total: Arc::new(RwLock::new(EndpointRecord::new())),
            failures: Arc::new(RwLock::new(BTreeMap::new())),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn iteration_started(&self) {
        let mut metrics = self.metrics.write();
        metrics.iterations.started += 1;
        metrics.iterations.in_flight += 1;
    }

    pub fn iteration_completed(&self) {
        let mut metrics = self.metrics.write();
        metrics.iterations.completed += 1;
        metrics.iterations.in_flight = metrics.iterations.in_flight.saturating_sub(1);
    }

    pub fn iteration_rescheduled(&self) {
        let mut metrics = self.metrics.write();
        metrics.iterations.rescheduled += 1;
        metrics.iterations.in_flight = metrics.iterations.in_flight.saturating_sub(1);
    }

    /// Record a request that got the expected response
    pub fn record_success(&self, method: &Method, name: &str, elapsed: Duration) {
        self.record(method, name, elapsed, false);
    }

    /// Record a failed request under its endpoint name together with the failure message
    pub fn record_failure(&self, method: &Method, name: &str, elapsed: Duration, message: &str) {
        self.record(method, name, elapsed, true);

        let key = FailureKey {
            endpoint: endpoint_key(method, name),
            message: message.to_string(),
        };
        *self.failures.write().entry(key).or_insert(0) += 1;
    }

    fn record(&self, method: &Method, name: &str, elapsed: Duration, failed: bool) {
        self.endpoints
            .write()
            .entry(endpoint_key(method, name))
            .or_insert_with(EndpointRecord::new)
            .record(elapsed, failed);
        self.total.write().record(elapsed, failed);
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();
        metrics.system.cpu_usage = system.global_cpu_usage();
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TestMetrics {
        self.metrics.read().clone()
    }

    /// Per-endpoint statistics, ordered by name then method
    pub fn endpoint_stats(&self) -> Vec<EndpointStats> {
        let endpoints = self.endpoints.read();
        let mut stats: Vec<_> = endpoints
            .iter()
            .map(|(key, record)| record.stats(&key.method, &key.name))
            .collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.method.cmp(&b.method)));
        stats
    }

    pub fn total_stats(&self) -> EndpointStats {
        self.total.read().stats("", AGGREGATED)
    }

    /// Failure table, most frequent first
    pub fn failures(&self) -> Vec<FailureEntry> {
        let failures = self.failures.read();
        let mut entries: Vec<_> = failures
            .iter()
            .map(|(key, occurrences)| FailureEntry {
                method: key.endpoint.method.clone(),
                name: key.endpoint.name.clone(),
                message: key.message.clone(),
                occurrences: *occurrences,
            })
            .collect();
        entries.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        entries
    }

    pub fn summary(&self) -> Summary {
        Summary {
            elapsed_secs: self.elapsed_seconds(),
            iterations: self.get_snapshot().iterations,
            endpoints: self.endpoint_stats(),
            total: self.total_stats(),
            failures: self.failures(),
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn endpoint_key(method: &Method, name: &str) -> EndpointKey {
    EndpointKey {
        method: method.as_str().to_string(),
        name: name.to_string(),
    }
}
