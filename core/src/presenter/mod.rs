pub mod results;
pub mod selection;

pub use results::{FetchTicket, PresenterState, ResultsPresenter};
pub use selection::SelectionState;
