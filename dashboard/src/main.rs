use chart::LineChart;
use iced::{
    time,
    widget::{button, column, row, scrollable, text, text_input, Canvas, Column, Container, Row},
    Alignment, Color, Element, Length, Subscription, Task, Theme,
};
use inputs::InputBuffer;
use netvisorcore::charts::ChartState;
use netvisorcore::export::ExportDocument;
use netvisorcore::form::presets::presets_for;
use netvisorcore::form::{ApArrayField, Axis, FormField, PresetField, PresetOutcome, ScalarField};
use netvisorcore::history::{FileStorage, HistoryStore};
use netvisorcore::model::ENVIRONMENTS;
use netvisorcore::remote::{fetch_with_cancel, FetchResult, HttpBackend};
use netvisorcore::{
    ClientConfig, FormCollector, NavigationState, PresenterState, ResultsPresenter, SimulationId,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod chart;
mod inputs;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "NetVisor Wireless Simulation".into()
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    if state.presenter.state() == PresenterState::Loading {
        time::every(Duration::from_millis(500)).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Input,
    Results,
}

#[derive(Debug, Clone, Copy)]
enum ExportKind {
    Json,
    Csv,
}

struct Dashboard {
    screen: Screen,
    form: FormCollector,
    inputs: InputBuffer,
    presenter: ResultsPresenter<FileStorage>,
    backend: HttpBackend,
    status: String,
    loading_since: Option<Instant>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    ScalarChanged(ScalarField, String),
    ArrayChanged(ApArrayField, usize, String),
    PositionChanged(usize, Axis, String),
    AccessPointCountChanged(String),
    AddAccessPoint,
    RemoveAccessPoint,
    PresetSelected(PresetField, &'static str),
    EnvironmentSelected(&'static str),
    Submit,
    Fetched(SimulationId, FetchResult),
    ToggleUser(usize),
    ToggleAccessPoint(usize),
    SelectAllUsers(bool),
    SelectAllAccessPoints(bool),
    Replay(SimulationId),
    ClearHistory,
    Export(ExportKind),
    BackToForm,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let form = FormCollector::default();
        let inputs = InputBuffer::from_draft(form.draft());
        let config = ClientConfig::load(None).unwrap_or_else(|err| {
            log::warn!("{}; using defaults", err);
            ClientConfig::from_env()
        });
        log::info!("history stored in {}", config.history_dir.display());
        let backend = config.http_backend().unwrap_or_else(|err| {
            log::warn!("{}; continuing without a request timeout", err);
            HttpBackend::new(&config.api_url)
        });
        let status = format!("Service: {}", backend.endpoint());
        (
            Dashboard {
                screen: Screen::Input,
                form,
                inputs,
                presenter: ResultsPresenter::new(HistoryStore::load(FileStorage::new(
                    &config.history_dir,
                ))),
                backend,
                status,
                loading_since: None,
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::none(),
            Message::ScalarChanged(field, value) => {
                state.form.update_scalar(field, &value);
                state.inputs.set(FormField::Scalar(field), value);
                Task::none()
            }
            Message::ArrayChanged(field, index, value) => {
                state.form.update_array(field, index, &value);
                state.inputs.set(FormField::ApArray(field, index), value);
                Task::none()
            }
            Message::PositionChanged(index, axis, value) => {
                state.form.update_position(index, axis, &value);
                state.inputs.set(FormField::Position(index, axis), value);
                Task::none()
            }
            Message::AccessPointCountChanged(value) => {
                state.form.set_access_point_count_input(&value);
                state.inputs.set(FormField::AccessPointCount, value);
                state.inputs.sync_access_points(state.form.draft());
                Task::none()
            }
            Message::AddAccessPoint | Message::RemoveAccessPoint => {
                if matches!(message, Message::AddAccessPoint) {
                    state.form.add_access_point();
                } else {
                    state.form.remove_access_point();
                }
                state.inputs.set(
                    FormField::AccessPointCount,
                    state.form.draft().access_points().to_string(),
                );
                state.inputs.sync_access_points(state.form.draft());
                Task::none()
            }
            Message::PresetSelected(field, label) => {
                match state.form.apply_preset(field, label) {
                    Ok(PresetOutcome::Applied) => {
                        state.inputs.sync_access_points(state.form.draft());
                        state.status = format!("{}: {}", field.title(), label);
                    }
                    Ok(PresetOutcome::Custom) => {}
                    Ok(PresetOutcome::LengthMismatch {
                        preset,
                        access_points,
                    }) => {
                        state.status = format!(
                            "{} has {} entries; set {} access points to use it",
                            label, preset, preset
                        );
                        log::debug!("preset skipped for {} access points", access_points);
                    }
                    Err(err) => state.status = err.to_string(),
                }
                Task::none()
            }
            Message::EnvironmentSelected(label) => {
                match state.form.apply_environment(label) {
                    Ok(()) => {
                        let field = FormField::Scalar(ScalarField::PathLossExponent);
                        let value = state
                            .form
                            .draft()
                            .scalar(ScalarField::PathLossExponent)
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        state.inputs.set(field, value);
                        state.status = format!("Environment: {}", label);
                    }
                    Err(err) => state.status = err.to_string(),
                }
                Task::none()
            }
            Message::Submit => {
                let mut submitted = None;
                match state.form.submit(|params| submitted = Some(params)) {
                    Ok(()) => match submitted {
                        Some(params) => state.open(NavigationState::fresh(params)),
                        None => Task::none(),
                    },
                    Err(errors) => {
                        state.status = format!("{} field(s) need attention", errors.len());
                        Task::none()
                    }
                }
            }
            Message::Fetched(id, outcome) => {
                if state.presenter.complete(&id, outcome) {
                    state.loading_since = None;
                    state.status = match state.presenter.state() {
                        PresenterState::Error => format!("{} failed", id),
                        _ => format!("{} complete", id),
                    };
                }
                Task::none()
            }
            Message::ToggleUser(user) => {
                state.presenter.selection_mut().toggle_user(user);
                Task::none()
            }
            Message::ToggleAccessPoint(ap) => {
                state.presenter.selection_mut().toggle_access_point(ap);
                Task::none()
            }
            Message::SelectAllUsers(all) => {
                let selection = state.presenter.selection_mut();
                if all {
                    selection.select_all_users();
                } else {
                    selection.deselect_all_users();
                }
                Task::none()
            }
            Message::SelectAllAccessPoints(all) => {
                let selection = state.presenter.selection_mut();
                if all {
                    selection.select_all_access_points();
                } else {
                    selection.deselect_all_access_points();
                }
                Task::none()
            }
            Message::Replay(id) => match state.presenter.history().get(&id).cloned() {
                Some(entry) => state.open(NavigationState::replay(&entry)),
                None => Task::none(),
            },
            Message::ClearHistory => {
                if let Err(err) = state.presenter.history_mut().clear() {
                    state.status = err.to_string();
                } else {
                    state.status = "History cleared".into();
                }
                Task::none()
            }
            Message::Export(kind) => {
                state.status = match state.export(kind) {
                    Ok(path) => format!("Exported {}", path.display()),
                    Err(err) => format!("Export failed: {}", err),
                };
                Task::none()
            }
            Message::BackToForm => {
                state.presenter.close();
                state.loading_since = None;
                state.screen = Screen::Input;
                Task::none()
            }
        }
    }

    fn open(&mut self, nav: NavigationState) -> Task<Message> {
        self.screen = Screen::Results;
        let Some(ticket) = self.presenter.open(nav) else {
            self.loading_since = None;
            return Task::none();
        };
        self.loading_since = Some(Instant::now());
        self.status = format!("Running {}", ticket.simulation_id);

        let backend = self.backend.clone();
        let id = ticket.simulation_id;
        let params = ticket.params;
        let cancel = ticket.cancel;
        Task::perform(
            async move { fetch_with_cancel(&backend, &params, &cancel).await },
            move |outcome| Message::Fetched(id.clone(), outcome),
        )
    }

    fn export(&self, kind: ExportKind) -> netvisorcore::CoreResult<PathBuf> {
        let (Some(id), Some(params), Some(result)) = (
            self.presenter.simulation_id(),
            self.presenter.form_data(),
            self.presenter.result(),
        ) else {
            return Err(netvisorcore::CoreError::Export("nothing to export".into()));
        };
        let doc = ExportDocument::new(id.clone(), params.clone(), result.clone());
        let (contents, extension) = match kind {
            ExportKind::Json => (doc.to_json()?, "json"),
            ExportKind::Csv => (doc.to_csv()?, "csv"),
        };
        let path = PathBuf::from(doc.file_name(extension));
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let main = match state.screen {
            Screen::Input => state.form_view(),
            Screen::Results => state.results_view(),
        };

        let layout = row![main, state.history_view()]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn error_line(&self, field: FormField) -> Element<'_, Message> {
        match self.form.errors().get(field) {
            Some(message) => text(message)
                .size(12)
                .color(Color::from_rgb(0.95, 0.4, 0.4))
                .into(),
            None => Column::new().into(),
        }
    }

    fn form_view(&self) -> Element<'_, Message> {
        let scalars = ScalarField::ALL
            .into_iter()
            .fold(Column::new().spacing(6), |col, field| {
                col.push(text(field.label()).size(13))
                    .push(
                        text_input(field.wire_name(), self.inputs.get(FormField::Scalar(field)))
                            .on_input(move |value| Message::ScalarChanged(field, value))
                            .padding(6),
                    )
                    .push(self.error_line(FormField::Scalar(field)))
            });

        let environments = ENVIRONMENTS.iter().fold(
            Column::new().spacing(4),
            |col, environment| {
                col.push(
                    button(text(format!(
                        "{} ({})",
                        environment.label, environment.path_loss_exponent
                    ))
                    .size(12))
                    .on_press(Message::EnvironmentSelected(environment.label))
                    .padding(4),
                )
            },
        );

        let count_row = row![
            text("Access Points").size(14),
            text_input("1-10", self.inputs.get(FormField::AccessPointCount))
                .on_input(Message::AccessPointCountChanged)
                .padding(6)
                .width(Length::Fixed(60.0)),
            button("-").on_press(Message::RemoveAccessPoint),
            button("+").on_press(Message::AddAccessPoint),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let mut per_ap = Column::new()
            .spacing(10)
            .push(count_row)
            .push(self.error_line(FormField::AccessPointCount));
        for field in PresetField::ALL {
            per_ap = per_ap.push(self.ap_block(field));
        }

        let left = column![
            text("Simulation Parameters").size(26),
            scalars,
            text("Environment").size(16),
            scrollable(environments).height(Length::Fixed(180.0)),
        ]
        .spacing(10)
        .width(Length::Fixed(340.0));

        let right = column![
            text("Access Point Configuration").size(26),
            scrollable(per_ap).height(Length::Fill),
            button("Run Simulation").on_press(Message::Submit).padding(10),
            text(&self.status).size(14),
        ]
        .spacing(10)
        .width(Length::Fill);

        row![left, right].spacing(20).into()
    }

    fn ap_block(&self, field: PresetField) -> Element<'_, Message> {
        let presets = presets_for(field).into_iter().fold(
            Row::new().spacing(6),
            |row, preset| {
                row.push(
                    button(text(preset.label).size(12))
                        .on_press(Message::PresetSelected(field, preset.label))
                        .padding(4),
                )
            },
        );
        let header = row![
            text(field.title()).size(16),
            text(format!("({})", self.form.matching_preset(field))).size(12),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let count = self.form.draft().positions().len();
        let entries = match ApArrayField::from_preset_field(field) {
            Some(array) => (0..count).fold(Row::new().spacing(6), |row, index| {
                let key = FormField::ApArray(array, index);
                row.push(
                    column![
                        text_input(&format!("AP {}", index + 1), self.inputs.get(key))
                            .on_input(move |value| Message::ArrayChanged(array, index, value))
                            .padding(4)
                            .width(Length::Fixed(110.0)),
                        self.error_line(key),
                    ]
                    .spacing(2),
                )
            }),
            None => (0..count).fold(Row::new().spacing(6), |row, index| {
                let x = FormField::Position(index, Axis::X);
                let y = FormField::Position(index, Axis::Y);
                row.push(
                    column![
                        text(format!("AP {}", index + 1)).size(12),
                        text_input("x", self.inputs.get(x))
                            .on_input(move |value| Message::PositionChanged(index, Axis::X, value))
                            .padding(4)
                            .width(Length::Fixed(70.0)),
                        text_input("y", self.inputs.get(y))
                            .on_input(move |value| Message::PositionChanged(index, Axis::Y, value))
                            .padding(4)
                            .width(Length::Fixed(70.0)),
                        self.error_line(x),
                        self.error_line(y),
                    ]
                    .spacing(2),
                )
            }),
        };

        column![header, presets, scrollable(entries)]
            .spacing(4)
            .into()
    }

    fn results_view(&self) -> Element<'_, Message> {
        let title = match self.presenter.simulation_id() {
            Some(id) if self.presenter.is_historical() => format!("{} (from history)", id),
            Some(id) => id.to_string(),
            None => "No simulation".into(),
        };

        let header = row![
            button("Back").on_press(Message::BackToForm),
            text(title).size(22),
            button("Export JSON").on_press_maybe(
                self.presenter
                    .result()
                    .map(|_| Message::Export(ExportKind::Json))
            ),
            button("Export CSV").on_press_maybe(
                self.presenter
                    .result()
                    .map(|_| Message::Export(ExportKind::Csv))
            ),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let body: Element<'_, Message> = match self.presenter.state() {
            PresenterState::Idle => text("Nothing to show yet").into(),
            PresenterState::Loading => {
                let elapsed = self
                    .loading_since
                    .map(|since| since.elapsed().as_secs())
                    .unwrap_or(0);
                text(format!("Running simulation... {}s", elapsed))
                    .size(18)
                    .into()
            }
            PresenterState::Success | PresenterState::Error => self.charts_view(),
        };

        column![header, text(&self.status).size(14), body]
            .spacing(12)
            .width(Length::Fill)
            .into()
    }

    fn selection_view(&self) -> Element<'_, Message> {
        let selection = self.presenter.selection();
        let toggle = |label: String, selected: bool, message: Message| {
            let caption = if selected {
                format!("[x] {}", label)
            } else {
                format!("[ ] {}", label)
            };
            button(text(caption).size(12)).on_press(message).padding(4)
        };

        let users = (0..selection.user_count()).fold(
            Row::new()
                .spacing(4)
                .push(text("Users").size(14))
                .push(button("All").on_press(Message::SelectAllUsers(true)))
                .push(button("None").on_press(Message::SelectAllUsers(false))),
            |row, user| {
                row.push(toggle(
                    format!("User {}", user + 1),
                    selection.is_user_selected(user),
                    Message::ToggleUser(user),
                ))
            },
        );
        let aps = (0..selection.access_point_count()).fold(
            Row::new()
                .spacing(4)
                .push(text("APs").size(14))
                .push(button("All").on_press(Message::SelectAllAccessPoints(true)))
                .push(button("None").on_press(Message::SelectAllAccessPoints(false))),
            |row, ap| {
                row.push(toggle(
                    format!("AP {}", ap + 1),
                    selection.is_access_point_selected(ap),
                    Message::ToggleAccessPoint(ap),
                ))
            },
        );

        column![scrollable(users), scrollable(aps)].spacing(6).into()
    }

    fn charts_view(&self) -> Element<'_, Message> {
        let Some(dashboard) = self.presenter.dashboard() else {
            return text("No result").into();
        };

        let panels = dashboard
            .panels()
            .into_iter()
            .fold(Column::new().spacing(16), |col, panel| {
                col.push(chart_panel(panel))
            });

        column![
            self.selection_view(),
            scrollable(panels).height(Length::Fill)
        ]
        .spacing(10)
        .into()
    }

    fn history_view(&self) -> Element<'_, Message> {
        let history = self.presenter.history();
        let entries = if history.is_empty() {
            Column::new().push(text("No simulation history yet").size(12))
        } else {
            history
                .entries()
                .iter()
                .fold(Column::new().spacing(6), |col, entry| {
                    col.push(
                        button(
                            column![
                                text(entry.summary.clone()).size(13),
                                text(entry.id.to_string()).size(10),
                            ]
                            .spacing(2),
                        )
                        .on_press(Message::Replay(entry.id.clone()))
                        .width(Length::Fill)
                        .padding(6),
                    )
                })
        };

        column![
            text("History").size(22),
            scrollable(entries).height(Length::Fill),
            button("Clear History").on_press_maybe(
                (!history.is_empty()).then_some(Message::ClearHistory)
            ),
        ]
        .spacing(10)
        .width(Length::Fixed(260.0))
        .into()
    }
}

fn chart_panel(panel: &ChartState) -> Element<'static, Message> {
    match panel {
        ChartState::Error(message) => text(format!("Error: {}", message))
            .size(14)
            .color(Color::from_rgb(0.95, 0.4, 0.4))
            .into(),
        ChartState::Empty => text("No data available").size(14).into(),
        ChartState::Ready(view) => {
            let legend = view
                .series
                .iter()
                .enumerate()
                .fold(Row::new().spacing(10), |row, (i, line)| {
                    row.push(
                        text(line.label.clone())
                            .size(11)
                            .color(chart::series_color(i)),
                    )
                });
            column![
                text(view.title).size(18),
                Canvas::new(LineChart::new(view))
                    .width(Length::Fill)
                    .height(Length::Fixed(240.0)),
                scrollable(legend),
            ]
            .spacing(6)
            .into()
        }
    }
}
