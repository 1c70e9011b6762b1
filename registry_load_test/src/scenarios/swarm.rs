//! Swarm scenario - many simulated users, each running paced journey iterations

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::watch;
use tokio::time::{sleep, Instant};

use crate::config::SwarmConfig;
use crate::journey::UserJourney;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::pacing::ConstantThroughput;
use crate::transport::{HttpTransport, RegistryTransport};

pub async fn run(config: SwarmConfig) -> Result<()> {
    tracing::info!("Starting swarm scenario");

    let transport = Arc::new(HttpTransport::new(
        &config.target.host,
        config.target.request_timeout,
    )?);

    let collector = MetricsCollector::new();
    run_with_transport(&config, transport, collector.clone()).await?;

    // Print final report
    reporter::print_final_report(&collector);

    if let Some(path) = &config.summary_json {
        reporter::write_summary_json(&collector, path)?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}

/// Hatch the users, run until the duration elapses or Ctrl+C, then wait for
/// in-flight iterations to finish
pub async fn run_with_transport(
    config: &SwarmConfig,
    transport: Arc<dyn RegistryTransport>,
    collector: MetricsCollector,
) -> Result<()> {
    let pacer = ConstantThroughput::new(config.rate)
        .ok_or_else(|| anyhow!("Invalid per user rate: {}", config.rate))?;
    let hatch_interval = Duration::try_from_secs_f64(1.0 / config.hatch_rate)?;

    let journey = Arc::new(UserJourney::new(
        transport,
        config.target.profile.clone(),
        collector.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start periodic metrics reporter
    let reporter_handle = tokio::spawn(reporter::start_periodic_reporter(
        collector.clone(),
        config.report_interval,
        shutdown_rx.clone(),
    ));

    let stop = stop_signal(config.duration);
    tokio::pin!(stop);

    tracing::info!(
        "Hatching {} users at {}/sec, {} iterations/sec per user ({:.2}/sec total)",
        config.users,
        config.hatch_rate,
        config.rate,
        config.target_throughput()
    );

    let mut user_handles = Vec::with_capacity(config.users);
    let mut stopped = false;

    for user_id in 0..config.users {
        user_handles.push(tokio::spawn(run_user(
            user_id,
            journey.clone(),
            pacer,
            shutdown_rx.clone(),
        )));

        if user_id + 1 == config.users {
            tracing::info!("All {} users hatched", config.users);
            break;
        }

        tokio::select! {
            _ = sleep(hatch_interval) => {}
            _ = &mut stop => {
                stopped = true;
                break;
            }
        }
    }

    if !stopped {
        (&mut stop).await;
    }

    tracing::info!(
        "Stopping {} users, waiting for in-flight iterations...",
        user_handles.len()
    );
    // Receivers only go away once every user has finished
    let _ = shutdown_tx.send(true);

    for (idx, handle) in user_handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            tracing::error!("User {} panicked: {}", idx, e);
        }
    }

    if let Err(e) = reporter_handle.await {
        tracing::error!("Reporter task panicked: {}", e);
    }

    tracing::info!("All users stopped");
    Ok(())
}

async fn stop_signal(duration: Duration) {
    let deadline = sleep(duration);
    tokio::pin!(deadline);

    tokio::select! {
        _ = &mut deadline => {
            tracing::info!("Load test duration completed");
        }
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Received Ctrl+C"),
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                deadline.await;
            }
        },
    }
}

/// One simulated user: run an iteration, wait for the rest of the pacing
/// period, repeat until shutdown. Failed iterations are simply followed by
/// the next one with a new payload.
pub async fn run_user(
    user_id: usize,
    journey: Arc<UserJourney>,
    pacer: ConstantThroughput,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!(user_id, "User started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let started = Instant::now();
        if let Err(e) = journey.run_iteration().await {
            tracing::debug!(user_id, "Iteration rescheduled: {}", e);
        }

        let wait = pacer.wait_time(started.elapsed());
        tokio::select! {
            _ = sleep(wait) => {}
            _ = shutdown.wait_for(|stop| *stop) => break,
        }
    }

    tracing::debug!(user_id, "User stopped");
}
