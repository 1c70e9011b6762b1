//! The scripted user journey.
//!
//! One iteration is three dependent requests against the registry:
//!
//! 1. `POST` a freshly generated shell descriptor, expecting `201 Created`
//! 2. `GET` it back by its (encoded) id, expecting `200 OK`
//! 3. `GET` the lookup endpoint with its specific asset ids, expecting `200 OK`
//!
//! The first unexpected outcome is recorded as a named failure and ends the
//! iteration; the caller reschedules a new iteration with a new payload.
//! Nothing is retried in place and nothing created is cleaned up.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};

use crate::config::ApiProfile;
use crate::error::JourneyError;
use crate::metrics::MetricsCollector;
use crate::payload::ShellPayload;
use crate::transport::{RegistryRequest, RegistryTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Create,
    ReadBack,
    Lookup,
}

impl Step {
    pub fn expected_status(self) -> StatusCode {
        match self {
            Step::Create => StatusCode::CREATED,
            Step::ReadBack | Step::Lookup => StatusCode::OK,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Step::Create => Method::POST,
            Step::ReadBack | Step::Lookup => Method::GET,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Create => "create",
            Step::ReadBack => "read-back",
            Step::Lookup => "lookup",
        };
        f.write_str(name)
    }
}

pub struct UserJourney {
    transport: Arc<dyn RegistryTransport>,
    profile: ApiProfile,
    collector: MetricsCollector,
}

impl UserJourney {
    pub fn new(
        transport: Arc<dyn RegistryTransport>,
        profile: ApiProfile,
        collector: MetricsCollector,
    ) -> Self {
        Self {
            transport,
            profile,
            collector,
        }
    }

    pub fn profile(&self) -> &ApiProfile {
        &self.profile
    }

    /// Run one iteration with a freshly generated payload
    pub async fn run_iteration(&self) -> Result<(), JourneyError> {
        let shell = self.profile.generate_shell();
        self.run_with(&shell).await
    }

    /// Run one iteration with the given payload
    pub async fn run_with(&self, shell: &ShellPayload) -> Result<(), JourneyError> {
        self.collector.iteration_started();

        let result = self.steps(shell).await;
        match &result {
            Ok(()) => self.collector.iteration_completed(),
            Err(err) => {
                tracing::debug!(
                    shell_id = shell.id(),
                    step = %err.step(),
                    "Iteration abandoned: {}",
                    err
                );
                self.collector.iteration_rescheduled();
            }
        }
        result
    }

    async fn steps(&self, shell: &ShellPayload) -> Result<(), JourneyError> {
        let body = shell
            .to_json()
            .map_err(|source| self.payload_failure(Step::Create, source))?;
        self.execute(Step::Create, self.profile.create_request(body))
            .await?;

        self.execute(Step::ReadBack, self.profile.read_back_request(shell.id()))
            .await?;

        let asset_ids = shell
            .specific_asset_ids_json()
            .map_err(|source| self.payload_failure(Step::Lookup, source))?;
        self.execute(Step::Lookup, self.profile.lookup_request(&asset_ids))
            .await
    }

    async fn execute(&self, step: Step, request: RegistryRequest) -> Result<(), JourneyError> {
        let expected = step.expected_status();
        let started = Instant::now();
        let outcome = self.transport.send(&request).await;
        let elapsed = started.elapsed();

        let err = match outcome {
            Ok(status) if status == expected => {
                tracing::debug!(
                    method = %request.method,
                    name = %request.name,
                    status = status.as_u16(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "{} succeeded",
                    step
                );
                self.collector
                    .record_success(&request.method, &request.name, elapsed);
                return Ok(());
            }
            Ok(status) => JourneyError::UnexpectedStatus {
                step,
                endpoint: request.name.clone(),
                expected: expected.as_u16(),
                actual: status.as_u16(),
            },
            Err(source) => JourneyError::Transport {
                step,
                endpoint: request.name.clone(),
                source,
            },
        };

        let message = err.to_string();
        tracing::warn!(
            method = %request.method,
            name = %request.name,
            "{} failed: {}",
            step,
            message
        );
        self.collector
            .record_failure(&request.method, &request.name, elapsed, &message);
        Err(err)
    }

    /// A request that could not be built is a failure of its step, recorded
    /// under the step's endpoint name with no latency
    fn payload_failure(&self, step: Step, source: serde_json::Error) -> JourneyError {
        let err = JourneyError::Payload {
            step,
            endpoint: self.profile.endpoint_name(step),
            source,
        };
        let message = err.to_string();
        tracing::warn!(
            method = %step.method(),
            name = %err.endpoint(),
            "{} failed: {}",
            step,
            message
        );
        self.collector
            .record_failure(&step.method(), err.endpoint(), Duration::ZERO, &message);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::v3_profile;
    use crate::error::TransportError;

    #[test]
    fn expected_statuses() {
        assert_eq!(Step::Create.expected_status(), StatusCode::CREATED);
        assert_eq!(Step::ReadBack.expected_status(), StatusCode::OK);
        assert_eq!(Step::Lookup.expected_status(), StatusCode::OK);
    }

    #[test]
    fn step_methods() {
        assert_eq!(Step::Create.method(), Method::POST);
        assert_eq!(Step::ReadBack.method(), Method::GET);
        assert_eq!(Step::Lookup.method(), Method::GET);
    }

    #[test]
    fn step_names() {
        assert_eq!(Step::Create.to_string(), "create");
        assert_eq!(Step::ReadBack.to_string(), "read-back");
        assert_eq!(Step::Lookup.to_string(), "lookup");
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl RegistryTransport for Unreachable {
        async fn send(&self, _: &RegistryRequest) -> Result<StatusCode, TransportError> {
            Err(TransportError::Connection("unreachable".to_string()))
        }
    }

    #[test]
    fn payload_failures_are_named_failures() {
        let collector = MetricsCollector::new();
        let journey = UserJourney::new(
            Arc::new(Unreachable),
            v3_profile("/api/v3", None),
            collector.clone(),
        );

        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = journey.payload_failure(Step::Lookup, source);
        assert_eq!(err.step(), Step::Lookup);
        assert_eq!(err.endpoint(), "/api/v3/lookup/shells?assetIds={assetIds}");

        let failures = collector.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].method, "GET");
        assert_eq!(failures[0].name, "/api/v3/lookup/shells?assetIds={assetIds}");
        assert_eq!(failures[0].message, err.to_string());
        assert_eq!(collector.total_stats().failures, 1);
    }
}
