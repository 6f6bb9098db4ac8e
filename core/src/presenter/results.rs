use crate::charts::DashboardView;
use crate::history::{HistoryEntry, HistoryStore, Storage};
use crate::model::{SimulationParameters, SimulationResult};
use crate::navigation::{NavigationState, SimulationId};
use crate::presenter::selection::SelectionState;
use crate::remote::{fetch_with_cancel, FetchResult, SimulationBackend};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use tokio_util::sync::CancellationToken;

/// `idle -> loading -> {success | error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    Idle,
    Loading,
    Success,
    Error,
}

/// A request the host must run and report back through
/// [`ResultsPresenter::complete`].
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub simulation_id: SimulationId,
    pub params: SimulationParameters,
    pub cancel: CancellationToken,
}

/// Drives one dashboard: fetch or replay, store the result, record history,
/// and hold the series filters.
pub struct ResultsPresenter<S: Storage> {
    history: HistoryStore<S>,
    simulation_id: Option<SimulationId>,
    form_data: Option<SimulationParameters>,
    is_historical: bool,
    has_fetched: bool,
    in_flight: Option<CancellationToken>,
    result: Option<SimulationResult>,
    state: PresenterState,
    selection: SelectionState,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl<S: Storage> ResultsPresenter<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            history,
            simulation_id: None,
            form_data: None,
            is_historical: false,
            has_fetched: false,
            in_flight: None,
            result: None,
            state: PresenterState::Idle,
            selection: SelectionState::default(),
            metrics: MetricsRecorder::new(),
            logger: LogManager::scoped("presenter"),
        }
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn form_data(&self) -> Option<&SimulationParameters> {
        self.form_data.as_ref()
    }

    pub fn simulation_id(&self) -> Option<&SimulationId> {
        self.simulation_id.as_ref()
    }

    pub fn is_historical(&self) -> bool {
        self.is_historical
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore<S> {
        &mut self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Filters only change which series are derived, never the result.
    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn dashboard(&self) -> Option<DashboardView> {
        self.result
            .as_ref()
            .map(|result| DashboardView::build(result, &self.selection))
    }

    /// Shows `nav`. Returns a ticket when a request must be issued; replays and
    /// repeated opens of the current identifier return `None`.
    pub fn open(&mut self, nav: NavigationState) -> Option<FetchTicket> {
        if self.has_fetched && self.simulation_id.as_ref() == Some(&nav.simulation_id) {
            self.logger
                .debug(&format!("{} already requested", nav.simulation_id));
            return None;
        }

        self.cancel_in_flight();
        self.simulation_id = Some(nav.simulation_id.clone());
        self.form_data = Some(nav.form_data.clone());
        self.is_historical = nav.is_historical;
        self.has_fetched = true;
        self.result = None;

        if let Some(saved) = nav.saved_result {
            self.metrics.record_replayed();
            self.logger
                .record(&format!("replaying {}", nav.simulation_id));
            self.commit(saved);
            return None;
        }

        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.state = PresenterState::Loading;
        self.metrics.record_requested();
        self.logger
            .record(&format!("requesting {}", nav.simulation_id));

        Some(FetchTicket {
            simulation_id: nav.simulation_id,
            params: nav.form_data,
            cancel,
        })
    }

    /// Applies the outcome of a ticket. Returns `false` when the outcome was
    /// discarded because the request was aborted or superseded.
    pub fn complete(&mut self, simulation_id: &SimulationId, outcome: FetchResult) -> bool {
        if self.simulation_id.as_ref() != Some(simulation_id) {
            self.logger
                .debug(&format!("dropping superseded response for {}", simulation_id));
            return false;
        }
        let Some(token) = self.in_flight.take() else {
            return false;
        };
        if token.is_cancelled() {
            self.discard_aborted(simulation_id);
            return false;
        }

        match outcome {
            Ok(result) => self.commit(result),
            Err(err) if err.is_aborted() => {
                self.discard_aborted(simulation_id);
                return false;
            }
            Err(err) => {
                self.logger
                    .warn(&format!("simulation {} failed: {}", simulation_id, err));
                self.commit(SimulationResult::failed(err.to_string()));
            }
        }
        true
    }

    /// Tears the dashboard down, aborting any outstanding request.
    pub fn close(&mut self) {
        self.cancel_in_flight();
        self.simulation_id = None;
        self.has_fetched = false;
    }

    /// Opens `nav` and, when needed, runs the request to completion.
    pub async fn run<B>(&mut self, backend: &B, nav: NavigationState) -> PresenterState
    where
        B: SimulationBackend + Sync,
    {
        if let Some(ticket) = self.open(nav) {
            let outcome = fetch_with_cancel(backend, &ticket.params, &ticket.cancel).await;
            self.complete(&ticket.simulation_id, outcome);
        }
        self.state
    }

    /// An aborted request leaves nothing to show; opening the id again
    /// issues a fresh request.
    fn discard_aborted(&mut self, simulation_id: &SimulationId) {
        self.metrics.record_aborted();
        self.has_fetched = false;
        self.state = PresenterState::Idle;
        self.logger
            .debug(&format!("request for {} aborted", simulation_id));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            self.metrics.record_aborted();
            self.logger.debug("aborted outstanding request");
        }
    }

    fn commit(&mut self, result: SimulationResult) {
        let failed = result.is_error();
        self.state = if failed {
            PresenterState::Error
        } else {
            PresenterState::Success
        };
        if failed {
            self.metrics.record_failed();
        } else {
            self.metrics.record_succeeded();
        }

        let form_data = self.form_data.clone().unwrap_or_default();
        let users = match result.user_count() {
            0 => form_data.number_of_nodes as usize,
            n => n,
        };
        self.selection = SelectionState::all(users, form_data.number_of_access_points);

        // Failed runs stay out of history.
        if !failed {
            if let Some(id) = self.simulation_id.clone() {
                let entry = HistoryEntry::new(id, form_data, result.clone());
                if let Err(err) = self.history.append_if_absent(entry) {
                    self.logger.warn(&format!("history not saved: {}", err));
                }
            }
        }

        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStorage;
    use crate::remote::FetchError;
    use std::future::Future;

    fn presenter() -> ResultsPresenter<MemoryStorage> {
        ResultsPresenter::new(HistoryStore::load(MemoryStorage::new()))
    }

    fn two_ap_params() -> SimulationParameters {
        SimulationParameters {
            number_of_access_points: 2,
            transmission_powers: vec![23.0, 23.0],
            frequencies: vec![2.4e9, 2.4e9],
            bandwidths: vec![20e6, 20e6],
            ap_positions: vec![[0.0, 0.0], [50.0, 0.0]],
            antenna_gains: vec![0.0, 0.0],
            beamwidths: vec![360.0, 360.0],
            ..Default::default()
        }
    }

    fn ok_result(users: usize) -> SimulationResult {
        SimulationResult {
            time: vec![0.0, 1.0],
            users_throughput: vec![vec![1e6, 1e6]; users],
            ..Default::default()
        }
    }

    struct FixedBackend(FetchResult);

    impl SimulationBackend for FixedBackend {
        fn simulate(&self, _params: &SimulationParameters) -> impl Future<Output = FetchResult> + Send {
            let outcome = self.0.clone();
            async move { outcome }
        }
    }

    #[test]
    fn fresh_open_issues_one_request_per_id() {
        let mut presenter = presenter();
        let nav = NavigationState::fresh(two_ap_params());
        assert!(presenter.open(nav.clone()).is_some());
        assert_eq!(presenter.state(), PresenterState::Loading);
        assert!(presenter.open(nav).is_none());
        assert_eq!(presenter.metrics().requested, 1);
    }

    #[test]
    fn success_records_history_and_selects_everything() {
        let mut presenter = presenter();
        let ticket = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        assert!(presenter.complete(&ticket.simulation_id, Ok(ok_result(4))));
        assert_eq!(presenter.state(), PresenterState::Success);
        assert_eq!(presenter.history().len(), 1);
        assert_eq!(presenter.selection().users().count(), 4);
        assert_eq!(presenter.selection().access_points().count(), 2);
    }

    #[test]
    fn failed_fetch_synthesizes_error_result_without_history() {
        let mut presenter = presenter();
        let ticket = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        presenter.complete(
            &ticket.simulation_id,
            Err(FetchError::Transport("connection refused".into())),
        );
        assert_eq!(presenter.state(), PresenterState::Error);
        let result = presenter.result().unwrap();
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert!(!result.has_series());
        assert!(presenter.history().is_empty());
        // No series: selection falls back to the requested node count.
        assert_eq!(presenter.selection().users().count(), 3);
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut presenter = presenter();
        let first = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        let second = presenter
            .open(NavigationState::fresh(SimulationParameters::default()))
            .unwrap();
        assert!(first.cancel.is_cancelled());
        assert!(!presenter.complete(&first.simulation_id, Ok(ok_result(1))));
        assert!(presenter.result().is_none());
        assert_eq!(presenter.state(), PresenterState::Loading);

        assert!(presenter.complete(&second.simulation_id, Ok(ok_result(1))));
        assert_eq!(presenter.history().entries()[0].id, second.simulation_id);
    }

    #[test]
    fn close_aborts_and_drops_late_response() {
        let mut presenter = presenter();
        let ticket = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        presenter.close();
        assert!(ticket.cancel.is_cancelled());
        assert!(!presenter.complete(&ticket.simulation_id, Ok(ok_result(1))));
        assert!(presenter.result().is_none());
        assert_eq!(presenter.metrics().aborted, 1);
    }

    #[test]
    fn externally_cancelled_request_can_be_reopened() {
        let mut presenter = presenter();
        let nav = NavigationState::fresh(two_ap_params());
        let ticket = presenter.open(nav.clone()).unwrap();
        ticket.cancel.cancel();
        assert!(!presenter.complete(&ticket.simulation_id, Err(FetchError::Aborted)));
        assert_eq!(presenter.state(), PresenterState::Idle);
        assert!(presenter.result().is_none());
        assert_eq!(presenter.metrics().aborted, 1);

        let retry = presenter.open(nav).unwrap();
        assert_eq!(retry.simulation_id, ticket.simulation_id);
        assert!(presenter.complete(&retry.simulation_id, Ok(ok_result(2))));
        assert_eq!(presenter.state(), PresenterState::Success);
        assert_eq!(presenter.metrics().requested, 2);
    }

    #[test]
    fn aborted_outcome_without_cancellation_resets_to_idle() {
        let mut presenter = presenter();
        let nav = NavigationState::fresh(two_ap_params());
        let ticket = presenter.open(nav.clone()).unwrap();
        assert!(!presenter.complete(&ticket.simulation_id, Err(FetchError::Aborted)));
        assert_eq!(presenter.state(), PresenterState::Idle);
        assert!(presenter.open(nav).is_some());
    }

    #[test]
    fn replay_enters_success_without_request_and_does_not_duplicate() {
        let mut presenter = presenter();
        let ticket = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        presenter.complete(&ticket.simulation_id, Ok(ok_result(2)));
        let entry = presenter.history().entries()[0].clone();

        presenter.open(NavigationState::fresh(SimulationParameters::default()));
        assert!(presenter.open(NavigationState::replay(&entry)).is_none());
        assert_eq!(presenter.state(), PresenterState::Success);
        assert!(presenter.is_historical());
        assert_eq!(presenter.result(), Some(&entry.result));
        assert_eq!(presenter.history().len(), 1);
        assert_eq!(presenter.metrics().replayed, 1);
    }

    #[test]
    fn service_error_payload_ends_in_error_state() {
        let mut presenter = presenter();
        let ticket = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        presenter.complete(
            &ticket.simulation_id,
            Ok(SimulationResult::failed("matlab engine down")),
        );
        assert_eq!(presenter.state(), PresenterState::Error);
        assert!(presenter.history().is_empty());
    }

    #[test]
    fn selection_changes_do_not_touch_result() {
        let mut presenter = presenter();
        let ticket = presenter
            .open(NavigationState::fresh(two_ap_params()))
            .unwrap();
        presenter.complete(&ticket.simulation_id, Ok(ok_result(2)));
        let before = presenter.result().cloned();
        presenter.selection_mut().deselect_all_users();
        assert_eq!(presenter.result().cloned(), before);
        let view = presenter.dashboard().unwrap();
        assert!(view.throughput.view().unwrap().series.is_empty());
    }

    #[tokio::test]
    async fn run_drives_request_to_completion() {
        let mut presenter = presenter();
        let backend = FixedBackend(Err(FetchError::Status(503)));
        let state = presenter
            .run(&backend, NavigationState::fresh(two_ap_params()))
            .await;
        assert_eq!(state, PresenterState::Error);
        assert_eq!(
            presenter.result().unwrap().error.as_deref(),
            Some("HTTP error! status: 503")
        );

        let backend = FixedBackend(Ok(ok_result(3)));
        let state = presenter
            .run(&backend, NavigationState::fresh(two_ap_params()))
            .await;
        assert_eq!(state, PresenterState::Success);
        assert_eq!(presenter.history().len(), 1);
    }
}
