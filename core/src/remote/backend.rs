use crate::model::{SimulationParameters, SimulationResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Why a simulation request produced no usable payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("invalid simulation payload: {0}")]
    Decode(String),
    #[error("request aborted")]
    Aborted,
}

impl FetchError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }
}

pub type FetchResult = Result<SimulationResult, FetchError>;

/// The external simulation service.
pub trait SimulationBackend {
    fn simulate(
        &self,
        params: &SimulationParameters,
    ) -> impl Future<Output = FetchResult> + Send;
}

/// Runs `backend` until it answers or `cancel` fires, whichever comes first.
pub async fn fetch_with_cancel<B>(
    backend: &B,
    params: &SimulationParameters,
    cancel: &CancellationToken,
) -> FetchResult
where
    B: SimulationBackend + Sync,
{
    if cancel.is_cancelled() {
        return Err(FetchError::Aborted);
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(FetchError::Aborted),
        outcome = backend.simulate(params) => outcome,
    }
}
