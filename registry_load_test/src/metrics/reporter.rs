//! Console reporter for metrics with real-time updates

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::collector::MetricsCollector;
use super::types::{EndpointStats, Summary};

/// Start periodic metrics reporting until `shutdown` flips to true
pub async fn start_periodic_reporter(
    collector: MetricsCollector,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.wait_for(|stop| *stop) => break,
        }

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

fn endpoint_row(stats: &EndpointStats) -> String {
    format!(
        "│ {:<6} {:<44} {:>8} {:>7} {:>7} {:>7} {:>7} {:>9.2} │",
        stats.method,
        truncate(&stats.name, 44),
        stats.requests,
        stats.failures,
        stats.latency.p50,
        stats.latency.p95,
        stats.latency.max,
        stats.latency.mean,
    )
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width - 1).collect();
        short.push('…');
        short
    }
}

fn print_endpoint_table(summary: &Summary) {
    println!("┌─ REQUESTS (latency in ms) ──────────────────────────────────────────────────────────────────┐");
    println!(
        "│ {:<6} {:<44} {:>8} {:>7} {:>7} {:>7} {:>7} {:>9} │",
        "Type", "Name", "# reqs", "# fails", "P50", "P95", "Max", "Avg"
    );
    for stats in &summary.endpoints {
        println!("{}", endpoint_row(stats));
    }
    println!("{}", endpoint_row(&summary.total));
    println!("└─────────────────────────────────────────────────────────────────────────────────────────────┘");
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let summary = collector.summary();
    let elapsed = summary.elapsed_secs;

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║             Registry Load Test - Live Metrics                  ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!(
        "\n⏱️  Elapsed Time: {:02}:{:02}:{:02}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60
    );

    // Iterations
    let iterations = &metrics.iterations;
    println!("\n┌─ ITERATIONS ────────────────────────────────────────────────┐");
    println!(
        "│  Started:      {:>8}    In-Flight:   {:>8}             │",
        iterations.started, iterations.in_flight
    );
    println!(
        "│  Completed:    {:>8}    Rescheduled: {:>8}             │",
        iterations.completed, iterations.rescheduled
    );
    if elapsed > 0 {
        let throughput = iterations.completed as f64 / elapsed as f64;
        println!("│  Throughput: {:>9.2}/sec                                    │", throughput);
    }
    println!("└─────────────────────────────────────────────────────────────┘\n");

    if !summary.endpoints.is_empty() {
        print_endpoint_table(&summary);
    }

    // System metrics
    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!(
        "│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to stop test]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}

/// Print final summary report
pub fn print_final_report(collector: &MetricsCollector) {
    let summary = collector.summary();
    let elapsed = summary.elapsed_secs;
    let iterations = &summary.iterations;

    println!("\n╔════════════════════════════════════════════════════════════════╗");
    println!("║                    FINAL TEST REPORT                           ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n📊 ITERATIONS");
    println!("   Total Started:        {:>10}", iterations.started);
    println!("   Total Completed:      {:>10}", iterations.completed);
    println!("   Total Rescheduled:    {:>10}", iterations.rescheduled);

    if elapsed > 0 {
        let throughput = iterations.completed as f64 / elapsed as f64;
        println!("   Throughput:           {:>10.2} iterations/sec", throughput);
    }

    if iterations.started > 0 {
        let success_rate = (iterations.completed as f64 / iterations.started as f64) * 100.0;
        println!("   Success Rate:         {:>10.2}%", success_rate);
    }

    if summary.total.requests > 0 {
        println!();
        print_endpoint_table(&summary);

        let latency = &summary.total.latency;
        println!("\n📈 REQUEST LATENCY (all endpoints)");
        println!("   Min:                  {:>10} ms", latency.min);
        println!("   P50 (Median):         {:>10} ms", latency.p50);
        println!("   P95:                  {:>10} ms", latency.p95);
        println!("   P99:                  {:>10} ms", latency.p99);
        println!("   Max:                  {:>10} ms", latency.max);
        println!("   Mean:                 {:>10.2} ms", latency.mean);
    }

    if !summary.failures.is_empty() {
        println!("\n❌ FAILURES");
        for failure in &summary.failures {
            println!(
                "   {:>6}  {} {}: {}",
                failure.occurrences, failure.method, failure.name, failure.message
            );
        }
    }

    println!("\n⏱️  Test Duration: {} seconds", elapsed);
    println!("════════════════════════════════════════════════════════════════\n");
}

/// Write the final statistics as pretty-printed JSON
pub fn write_summary_json(collector: &MetricsCollector, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&collector.summary())
        .context("Failed to serialize summary")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        let name = "/api/v3/lookup/shells?assetIds={assetIds}/and/more/segments";
        let short = truncate(name, 44);
        assert_eq!(short.chars().count(), 44);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn summary_json_is_written() {
        let collector = MetricsCollector::new();
        collector.record_success(
            &Method::POST,
            "/registry/shell-descriptors",
            Duration::from_millis(12),
        );
        collector.record_failure(
            &Method::GET,
            "/registry/shell-descriptors/{id}",
            Duration::from_millis(3),
            "Expected 200 but status code was 404",
        );

        let path = std::env::temp_dir().join(format!(
            "registry-load-test-summary-{}.json",
            uuid::Uuid::new_v4()
        ));
        write_summary_json(&collector, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(written["total"]["requests"], 2);
        assert_eq!(written["total"]["failures"], 1);
        assert_eq!(written["endpoints"].as_array().unwrap().len(), 2);
        assert_eq!(
            written["failures"][0]["message"],
            "Expected 200 but status code was 404"
        );
    }
}
