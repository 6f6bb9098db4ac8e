pub mod environment;
pub mod parameters;
pub mod result;

pub use environment::{find_environment, Environment, ENVIRONMENTS};
pub use parameters::SimulationParameters;
pub use result::SimulationResult;
