//! Smoke scenario - a single journey iteration to validate the target before a long run

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{ApiProfile, TargetConfig};
use crate::error::JourneyError;
use crate::journey::UserJourney;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::payload::DescriptorIds;
use crate::transport::{HttpTransport, RegistryTransport};

pub async fn run(config: TargetConfig, shell_id: Option<String>) -> Result<()> {
    tracing::info!("Starting smoke scenario");

    let transport = Arc::new(HttpTransport::new(&config.host, config.request_timeout)?);
    let collector = MetricsCollector::new();

    let result = run_once(transport, &config.profile, collector.clone(), shell_id.as_deref()).await;

    reporter::print_final_report(&collector);

    result.context("Smoke iteration failed")?;
    tracing::info!("Smoke iteration succeeded");
    Ok(())
}

/// Run exactly one iteration, using `shell_id` for the descriptor when given
pub async fn run_once(
    transport: Arc<dyn RegistryTransport>,
    profile: &ApiProfile,
    collector: MetricsCollector,
    shell_id: Option<&str>,
) -> Result<(), JourneyError> {
    let shell = match shell_id {
        Some(id) => profile.shell_from_ids(&DescriptorIds::with_shell_id(id)),
        None => profile.generate_shell(),
    };
    tracing::info!(shell_id = shell.id(), "Running one iteration");

    let journey = UserJourney::new(transport, profile.clone(), collector);
    journey.run_with(&shell).await
}
