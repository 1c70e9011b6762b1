use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Registry Load Testing Tool
#[derive(Parser, Debug)]
#[command(name = "registry-load-test")]
#[command(about = "Load testing tool for the digital twin shell descriptor registry")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Run simulated users against the registry until the duration elapses (or Ctrl+C)
    Swarm(SwarmArgs),

    /// Run a single create / read-back / lookup iteration and report the outcome
    Smoke(SmokeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Registry base URL
    #[arg(long, default_value = "http://localhost:4243", env = "REGISTRY_HOST")]
    pub host: String,

    /// Per request timeout in seconds (defaults to the HTTP client's own)
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SwarmArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of simulated users
    #[arg(long, default_value = "10", env = "REGISTRY_USERS")]
    pub users: usize,

    /// Users started per second until all are running
    #[arg(long, default_value = "1.0")]
    pub hatch_rate: f64,

    /// Iterations per second per user (100 users * 0.1 = 10 iterations/sec)
    #[arg(long, default_value = "0.1", env = "REGISTRY_RATE")]
    pub rate: f64,

    /// Test duration in seconds
    #[arg(long, default_value = "60", env = "REGISTRY_DURATION")]
    pub duration: u64,

    /// Metrics reporting interval in seconds
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Write the final statistics as JSON to this file
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    #[command(subcommand)]
    pub api: Api,
}

#[derive(Args, Debug, Clone)]
pub struct SmokeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Use this shell id instead of a random one
    #[arg(long)]
    pub shell_id: Option<String>,

    #[command(subcommand)]
    pub api: Api,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Api {
    /// Legacy `/registry` API: raw ids in paths, no tenant header
    Legacy,

    /// v3 `/api/v3` API: base64url ids in paths, optional Edc-Bpn tenant header
    V3(V3Args),
}

#[derive(Args, Debug, Clone)]
pub struct V3Args {
    /// Business partner number sent as Edc-Bpn and used as external subject id
    #[arg(long, env = "REGISTRY_EDC_BPN")]
    pub edc_bpn: Option<String>,

    /// Path prefix of the v3 API
    #[arg(long, default_value = "/api/v3")]
    pub path_prefix: String,
}
