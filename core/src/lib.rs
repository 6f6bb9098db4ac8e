//! Client core for the NetVisor wireless simulation dashboard.
//!
//! The modules cover parameter entry and validation, the request lifecycle
//! against the simulation service, run history, chart series, and export.
//! Nothing here draws to a screen; the CLI and the dashboard share it.

pub mod charts;
pub mod config;
pub mod export;
pub mod form;
pub mod history;
pub mod math;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod presenter;
pub mod remote;
pub mod telemetry;

pub use config::ClientConfig;
pub use form::{FormCollector, ValidationErrors};
pub use model::{SimulationParameters, SimulationResult};
pub use navigation::{NavigationState, SimulationId};
pub use prelude::{CoreError, CoreResult};
pub use presenter::{PresenterState, ResultsPresenter};
