use crate::workflow::config::ClientConfig;
use anyhow::{anyhow, Context};
use netvisorcore::form::{FormCollector, PresetField, PresetOutcome, ScalarField};
use netvisorcore::history::{FileStorage, HistoryEntry, HistoryStore};
use netvisorcore::remote::{fetch_with_cancel, HttpBackend, SimulationBackend};
use netvisorcore::{
    NavigationState, PresenterState, ResultsPresenter, SimulationId, SimulationParameters,
    SimulationResult,
};
use tokio::signal;

/// Edits applied to a parameter file before submission.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub nodes: Option<u32>,
    pub access_points: Option<usize>,
    pub environment: Option<String>,
    /// `field=label` pairs, e.g. `powers=Mixed`.
    pub presets: Vec<String>,
    /// `wireName=value` pairs for scalar inputs.
    pub scalars: Vec<String>,
}

fn split_pair(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", raw))
}

/// Runs `params` plus `overrides` through the form rules. Rejections are
/// reported field by field.
pub fn build_parameters(
    params: &SimulationParameters,
    overrides: &Overrides,
) -> anyhow::Result<SimulationParameters> {
    let mut form = FormCollector::from_parameters(params);

    if let Some(count) = overrides.access_points {
        form.set_access_point_count_input(&count.to_string());
    }
    if let Some(nodes) = overrides.nodes {
        form.update_scalar(ScalarField::NumberOfNodes, &nodes.to_string());
    }
    for raw in &overrides.scalars {
        let (name, value) = split_pair(raw)?;
        let field = ScalarField::from_wire_name(name)
            .ok_or_else(|| anyhow!("unknown parameter '{}'", name))?;
        form.update_scalar(field, value);
    }
    if let Some(label) = &overrides.environment {
        form.apply_environment(label)?;
    }
    for raw in &overrides.presets {
        let (name, label) = split_pair(raw)?;
        let field =
            PresetField::parse(name).ok_or_else(|| anyhow!("unknown preset field '{}'", name))?;
        match form.apply_preset(field, label)? {
            PresetOutcome::Applied | PresetOutcome::Custom => {}
            PresetOutcome::LengthMismatch {
                preset,
                access_points,
            } => {
                return Err(anyhow!(
                    "preset '{}' has {} values but {} access points are configured",
                    label,
                    preset,
                    access_points
                ));
            }
        }
    }

    let mut submitted = None;
    form.submit(|params| submitted = Some(params))
        .map_err(|errors| anyhow!("invalid parameters: {}", errors))?;
    submitted.ok_or_else(|| anyhow!("form produced no parameters"))
}

/// Outcome of one pass through the presenter.
pub struct RunReport {
    pub simulation_id: SimulationId,
    pub parameters: SimulationParameters,
    pub state: PresenterState,
    pub result: Option<SimulationResult>,
    pub recorded: bool,
}

pub struct Runner {
    config: ClientConfig,
    presenter: ResultsPresenter<FileStorage>,
}

impl Runner {
    pub fn new(config: ClientConfig) -> Self {
        let history = HistoryStore::load(FileStorage::new(&config.history_dir));
        Self {
            config,
            presenter: ResultsPresenter::new(history),
        }
    }

    pub fn history(&self) -> &HistoryStore<FileStorage> {
        self.presenter.history()
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore<FileStorage> {
        self.presenter.history_mut()
    }

    pub fn backend(&self) -> anyhow::Result<HttpBackend> {
        self.config
            .http_backend()
            .with_context(|| format!("connecting to {}", self.config.api_url))
    }

    /// Submits fresh parameters; Ctrl+C aborts the outstanding request.
    pub async fn execute<B>(&mut self, backend: &B, params: SimulationParameters) -> RunReport
    where
        B: SimulationBackend + Sync,
    {
        let nav = NavigationState::fresh(params);
        let simulation_id = nav.simulation_id.clone();
        let parameters = nav.form_data.clone();

        if let Some(ticket) = self.presenter.open(nav) {
            let cancel = ticket.cancel.clone();
            let interrupt = tokio::spawn(async move {
                if signal::ctrl_c().await.is_ok() {
                    log::warn!("interrupt received; aborting request");
                    cancel.cancel();
                }
            });
            let outcome = fetch_with_cancel(backend, &ticket.params, &ticket.cancel).await;
            interrupt.abort();
            self.presenter.complete(&ticket.simulation_id, outcome);
        }

        let recorded = self.presenter.history().contains(&simulation_id);
        self.finish(simulation_id, parameters, recorded)
    }

    /// Re-opens a stored run without contacting the service.
    pub fn replay(&mut self, entry: &HistoryEntry) -> RunReport {
        let nav = NavigationState::replay(entry);
        let simulation_id = nav.simulation_id.clone();
        let parameters = nav.form_data.clone();
        self.presenter.open(nav);
        self.finish(simulation_id, parameters, true)
    }

    fn finish(
        &mut self,
        simulation_id: SimulationId,
        parameters: SimulationParameters,
        recorded: bool,
    ) -> RunReport {
        let state = self.presenter.state();
        let result = self.presenter.result().cloned();
        let metrics = self.presenter.metrics();
        log::debug!(
            "requests={} succeeded={} failed={} aborted={} replayed={}",
            metrics.requested,
            metrics.succeeded,
            metrics.failed,
            metrics.aborted,
            metrics.replayed
        );
        self.presenter.close();
        RunReport {
            simulation_id,
            parameters,
            state,
            result,
            recorded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netvisorcore::remote::FetchResult;
    use std::future::Future;
    use tempfile::TempDir;

    struct FixedBackend(FetchResult);

    impl SimulationBackend for FixedBackend {
        fn simulate(
            &self,
            _params: &SimulationParameters,
        ) -> impl Future<Output = FetchResult> + Send {
            let outcome = self.0.clone();
            async move { outcome }
        }
    }

    fn runner_in(dir: &TempDir) -> Runner {
        Runner::new(ClientConfig {
            history_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn presets_and_counts_flow_through_the_form() {
        let overrides = Overrides {
            nodes: Some(6),
            presets: vec!["powers=Mixed".into(), "apPositions=Line".into()],
            ..Default::default()
        };
        let params = build_parameters(&SimulationParameters::default(), &overrides).unwrap();
        assert_eq!(params.number_of_nodes, 6);
        assert_eq!(params.transmission_powers, vec![20.0, 23.0, 25.0]);
        assert_eq!(params.ap_positions[2], [50.0, 0.0]);
    }

    #[test]
    fn preset_sized_for_other_ap_count_is_refused() {
        let overrides = Overrides {
            access_points: Some(4),
            presets: vec!["powers=Mixed".into()],
            ..Default::default()
        };
        let err = build_parameters(&SimulationParameters::default(), &overrides).unwrap_err();
        assert!(err.to_string().contains("4 access points"));
    }

    #[test]
    fn scalar_overrides_and_environment_apply() {
        let overrides = Overrides {
            scalars: vec!["simulationTime=60".into(), "K0dB = 2".into()],
            environment: Some("Suburban outdoor".into()),
            ..Default::default()
        };
        let params = build_parameters(&SimulationParameters::default(), &overrides).unwrap();
        assert_eq!(params.simulation_time, 60.0);
        assert_eq!(params.k0_db, 2.0);
        assert_eq!(params.path_loss_exponent, 3.0);
        assert_eq!(params.environment_type.as_deref(), Some("Suburban outdoor"));
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let too_many = Overrides {
            access_points: Some(11),
            ..Default::default()
        };
        let err = build_parameters(&SimulationParameters::default(), &too_many).unwrap_err();
        assert!(err.to_string().starts_with("invalid parameters"));

        let unknown = Overrides {
            scalars: vec!["warpFactor=9".into()],
            ..Default::default()
        };
        assert!(build_parameters(&SimulationParameters::default(), &unknown).is_err());

        let malformed = Overrides {
            presets: vec!["powers".into()],
            ..Default::default()
        };
        assert!(build_parameters(&SimulationParameters::default(), &malformed).is_err());
    }

    #[tokio::test]
    async fn successful_run_lands_in_history() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_in(&dir);
        let backend = FixedBackend(Ok(SimulationResult {
            time: vec![0.0, 1.0],
            users_throughput: vec![vec![1e6, 1e6]],
            ..Default::default()
        }));

        let report = runner
            .execute(&backend, SimulationParameters::default())
            .await;
        assert_eq!(report.state, PresenterState::Success);
        assert!(report.recorded);

        let reloaded = runner_in(&dir);
        assert!(reloaded.history().contains(&report.simulation_id));
    }

    #[tokio::test]
    async fn failed_run_is_reported_but_not_recorded() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_in(&dir);
        let backend = FixedBackend(Err(netvisorcore::remote::FetchError::Status(503)));

        let report = runner
            .execute(&backend, SimulationParameters::default())
            .await;
        assert_eq!(report.state, PresenterState::Error);
        assert!(!report.recorded);
        let result = report.result.unwrap();
        assert_eq!(result.error.as_deref(), Some("HTTP error! status: 503"));
        assert!(runner.history().is_empty());
    }

    #[tokio::test]
    async fn replay_uses_the_stored_result() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_in(&dir);
        let backend = FixedBackend(Ok(SimulationResult {
            time: vec![0.0],
            ..Default::default()
        }));
        let first = runner
            .execute(&backend, SimulationParameters::default())
            .await;

        let entry = runner
            .history()
            .get(&first.simulation_id)
            .cloned()
            .unwrap();
        let replayed = runner.replay(&entry);
        assert_eq!(replayed.state, PresenterState::Success);
        assert_eq!(replayed.result, first.result);
        assert_eq!(runner.history().len(), 1);
    }
}
