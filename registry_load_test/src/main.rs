use anyhow::Result;
use clap::Parser;

use registry_load_test::cli::{Cli, Mode};
use registry_load_test::config::{SwarmConfig, TargetConfig};
use registry_load_test::scenarios;

fn init_tracing(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.mode {
        Mode::Swarm(args) => {
            init_tracing(args.target.verbose)?;
            let config = SwarmConfig::from_args(&args)?;

            tracing::info!("Registry Load Test Starting...");
            tracing::info!("Host: {}", config.target.host);
            tracing::info!("API: {:?}", config.target.profile.version);
            tracing::info!("Users: {}", config.users);
            tracing::info!("Hatch Rate: {}/sec", config.hatch_rate);
            tracing::info!("Rate: {}/sec per user", config.rate);
            tracing::info!("Duration: {}s", config.duration.as_secs());
            if let Some(bpn) = &config.target.profile.bpn {
                tracing::info!("Edc-Bpn: {}", bpn);
            }

            scenarios::swarm::run(config).await?;
        }

        Mode::Smoke(args) => {
            init_tracing(args.target.verbose)?;
            let config = TargetConfig::from_args(&args.target, &args.api)?;

            tracing::info!("Registry Smoke Test Starting...");
            tracing::info!("Host: {}", config.host);
            tracing::info!("API: {:?}", config.profile.version);

            scenarios::smoke::run(config, args.shell_id).await?;
        }
    }

    tracing::info!("Load test complete");

    Ok(())
}
