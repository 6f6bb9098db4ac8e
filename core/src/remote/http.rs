use crate::model::{SimulationParameters, SimulationResult};
use crate::remote::backend::{FetchError, FetchResult, SimulationBackend};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "NETVISOR_API_URL";
pub const SIMULATION_PATH: &str = "/api/simulation";

pub fn simulation_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), SIMULATION_PATH)
}

/// Posts parameters to `{base}/api/simulation` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: simulation_endpoint(base_url),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: simulation_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, params: &SimulationParameters) -> FetchResult {
        let response = self
            .client
            .post(&self.endpoint)
            .json(params)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        SimulationResult::from_json(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl SimulationBackend for HttpBackend {
    fn simulate(&self, params: &SimulationParameters) -> impl Future<Output = FetchResult> + Send {
        self.post(params)
    }
}
