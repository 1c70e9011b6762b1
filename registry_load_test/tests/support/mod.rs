#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use registry_load_test::error::TransportError;
use registry_load_test::transport::{RegistryRequest, RegistryTransport};
use reqwest::{Method, StatusCode};

type Responder = dyn Fn(&RegistryRequest, usize) -> Result<StatusCode, TransportError> + Send + Sync;

/// In-memory transport that answers with a closure and records every request.
///
/// The closure gets the request and its zero-based position in the run.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<RegistryRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&RegistryRequest, usize) -> Result<StatusCode, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A registry that accepts everything: 201 for POST, 200 for GET
    pub fn healthy() -> Arc<Self> {
        Self::new(|request, _| Ok(healthy_status(request)))
    }

    /// Healthy except that requests named `name` get `status`
    pub fn failing_on(name: &str, status: StatusCode) -> Arc<Self> {
        let name = name.to_string();
        Self::new(move |request, _| {
            if request.name == name {
                Ok(status)
            } else {
                Ok(healthy_status(request))
            }
        })
    }

    pub fn requests(&self) -> Vec<RegistryRequest> {
        self.requests.lock().clone()
    }
}

pub fn healthy_status(request: &RegistryRequest) -> StatusCode {
    if request.method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

#[async_trait]
impl RegistryTransport for ScriptedTransport {
    async fn send(&self, request: &RegistryRequest) -> Result<StatusCode, TransportError> {
        let position = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(request, position)
    }
}
