//! Run configuration.
//!
//! Command line arguments (with their environment fallbacks) are validated
//! once at startup and turned into [`TargetConfig`] / [`SwarmConfig`].

mod api_profiles;

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub use api_profiles::{legacy_profile, v3_profile, ApiProfile, ApiVersion, EDC_BPN_HEADER};

use crate::cli::{Api, SwarmArgs, TargetArgs};
use crate::error::ConfigError;

/// Where and how to reach the registry
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub host: Url,
    pub request_timeout: Option<Duration>,
    pub profile: ApiProfile,
}

impl TargetConfig {
    pub fn from_args(args: &TargetArgs, api: &Api) -> Result<Self, ConfigError> {
        let host = parse_host(&args.host)?;
        let request_timeout = args.request_timeout.map(Duration::from_secs);
        let profile = profile_from_args(api)?;

        Ok(Self {
            host,
            request_timeout,
            profile,
        })
    }
}

/// Settings of the swarm scenario
#[derive(Debug, Clone)]
pub struct SwarmConfig {
    pub target: TargetConfig,
    pub users: usize,
    pub hatch_rate: f64,
    /// Iterations per second per user
    pub rate: f64,
    pub duration: Duration,
    pub report_interval: Duration,
    pub summary_json: Option<PathBuf>,
}

impl SwarmConfig {
    pub fn from_args(args: &SwarmArgs) -> Result<Self, ConfigError> {
        let target = TargetConfig::from_args(&args.target, &args.api)?;

        if args.users == 0 {
            return Err(ConfigError::NoUsers);
        }
        if !(args.rate.is_finite() && args.rate > 0.0) {
            return Err(ConfigError::InvalidRate(args.rate));
        }
        if !(args.hatch_rate.is_finite() && args.hatch_rate > 0.0) {
            return Err(ConfigError::InvalidHatchRate(args.hatch_rate));
        }
        if args.duration == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if args.report_interval == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }

        Ok(Self {
            target,
            users: args.users,
            hatch_rate: args.hatch_rate,
            rate: args.rate,
            duration: Duration::from_secs(args.duration),
            report_interval: Duration::from_secs(args.report_interval),
            summary_json: args.summary_json.clone(),
        })
    }

    /// Aggregate target iterations per second once every user is running
    pub fn target_throughput(&self) -> f64 {
        self.users as f64 * self.rate
    }
}

fn parse_host(host: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(host).map_err(|source| ConfigError::InvalidHost {
        url: host.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(host.to_string())),
    }
}

fn profile_from_args(api: &Api) -> Result<ApiProfile, ConfigError> {
    match api {
        Api::Legacy => Ok(legacy_profile()),
        Api::V3(args) => {
            let prefix = args.path_prefix.as_str();
            if !prefix.starts_with('/') || (prefix.len() > 1 && prefix.ends_with('/')) {
                return Err(ConfigError::InvalidPathPrefix(prefix.to_string()));
            }
            // A lone "/" means the API sits at the root
            let prefix = prefix.trim_end_matches('/');

            let bpn = match args.edc_bpn.as_deref().map(str::trim) {
                Some("") => return Err(ConfigError::EmptyBpn),
                Some(bpn) => Some(bpn.to_string()),
                None => None,
            };
            Ok(v3_profile(prefix, bpn))
        }
    }
}
