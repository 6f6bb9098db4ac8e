pub mod backend;
pub mod http;

pub use backend::{fetch_with_cancel, FetchError, FetchResult, SimulationBackend};
pub use http::{simulation_endpoint, HttpBackend, DEFAULT_API_URL};
