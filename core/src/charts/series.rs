use crate::model::SimulationResult;
use crate::presenter::SelectionState;

/// One labelled line on a time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl LineSeries {
    fn new(label: String) -> Self {
        Self {
            label,
            points: Vec::new(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub title: &'static str,
    pub y_label: &'static str,
    pub series: Vec<LineSeries>,
    /// Series plotted against a second axis (retries, distance, MAC rate).
    pub secondary: Vec<LineSeries>,
    pub secondary_label: Option<&'static str>,
    pub y_range: Option<(f64, f64)>,
}

impl ChartView {
    fn new(title: &'static str, y_label: &'static str) -> Self {
        Self {
            title,
            y_label,
            series: Vec::new(),
            secondary: Vec::new(),
            secondary_label: None,
            y_range: None,
        }
    }
}

/// What a chart panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    Error(String),
    Empty,
    Ready(ChartView),
}

impl ChartState {
    pub fn view(&self) -> Option<&ChartView> {
        match self {
            ChartState::Ready(view) => Some(view),
            _ => None,
        }
    }
}

fn guard(result: &SimulationResult) -> Option<ChartState> {
    if let Some(message) = &result.error {
        return Some(ChartState::Error(message.clone()));
    }
    if result.time.is_empty() {
        return Some(ChartState::Empty);
    }
    None
}

/// Per-user `[user][step]` series; steps missing for a user are skipped.
fn per_user(
    time: &[f64],
    data: &[Vec<f64>],
    selection: &SelectionState,
    label: impl Fn(usize) -> String,
) -> Vec<LineSeries> {
    selection
        .users()
        .map(|user| {
            let mut line = LineSeries::new(label(user + 1));
            if let Some(samples) = data.get(user) {
                line.points = time
                    .iter()
                    .zip(samples.iter())
                    .map(|(t, v)| (*t, *v))
                    .collect();
            }
            line
        })
        .collect()
}

/// Best SINR across the selected APs per user and step, with the distance to
/// that AP on the secondary axis.
pub fn sinr_chart(result: &SimulationResult, selection: &SelectionState) -> ChartState {
    if let Some(state) = guard(result) {
        return state;
    }

    let mut view = ChartView::new("SINR vs Time", "SINR (dB)");
    view.secondary_label = Some("Distance (m)");

    for user in selection.users() {
        let mut sinr_line = LineSeries::new(format!("User {} SINR", user + 1));
        let mut distance_line = LineSeries::new(format!("User {} Distance", user + 1));

        for (step, t) in result.time.iter().enumerate() {
            let best = selection
                .access_points()
                .filter_map(|ap| {
                    let value = result.users_sinr.get(user)?.get(ap)?.get(step)?;
                    Some((ap, *value))
                })
                .fold(None, |best: Option<(usize, f64)>, (ap, value)| match best {
                    Some((_, current)) if current >= value => best,
                    _ => Some((ap, value)),
                });

            if let Some((ap, value)) = best {
                let distance = result
                    .users_distance
                    .get(user)
                    .and_then(|per_ap| per_ap.get(ap))
                    .and_then(|steps| steps.get(step))
                    .copied()
                    .unwrap_or(0.0);
                sinr_line.points.push((*t, value));
                distance_line.points.push((*t, distance));
            }
        }

        view.series.push(sinr_line);
        view.secondary.push(distance_line);
    }

    ChartState::Ready(view)
}

pub fn throughput_chart(result: &SimulationResult, selection: &SelectionState) -> ChartState {
    if let Some(state) = guard(result) {
        return state;
    }
    let mut view = ChartView::new("Throughput Analysis", "Throughput");
    view.series = per_user(&result.time, &result.users_throughput, selection, |u| {
        format!("User {} Throughput", u)
    });
    view.secondary = per_user(&result.time, &result.users_mac_throughput, selection, |u| {
        format!("User {} MAC Throughput", u)
    });
    view.secondary_label = Some("MAC Throughput");
    ChartState::Ready(view)
}

pub fn per_chart(result: &SimulationResult, selection: &SelectionState) -> ChartState {
    if let Some(state) = guard(result) {
        return state;
    }
    let mut view = ChartView::new("Packet Error Rate (PER)", "PER");
    view.series = per_user(&result.time, &result.users_per, selection, |u| {
        format!("User {}", u)
    });
    ChartState::Ready(view)
}

pub fn collision_chart(result: &SimulationResult, selection: &SelectionState) -> ChartState {
    if let Some(state) = guard(result) {
        return state;
    }
    let mut view = ChartView::new("Collisions and Retries", "Retries");
    view.series = per_user(&result.time, &result.users_retries, selection, |u| {
        format!("User {} Retries", u)
    });
    view.secondary = per_user(&result.time, &result.users_collision, selection, |u| {
        format!("User {} Collisions", u)
    });
    view.secondary_label = Some("Collisions");
    ChartState::Ready(view)
}

/// Serving AP id (1-based) per user; the axis spans every AP.
pub fn handover_chart(
    result: &SimulationResult,
    selection: &SelectionState,
    access_points: usize,
) -> ChartState {
    if let Some(state) = guard(result) {
        return state;
    }
    let mut view = ChartView::new("AP Handovers", "AP ID");
    view.series = per_user(&result.time, &result.users_handover, selection, |u| {
        format!("User {}", u)
    });
    view.y_range = Some((0.5, access_points as f64 + 0.5));
    ChartState::Ready(view)
}

pub fn format_throughput(bits_per_second: f64) -> String {
    format!("{:.2} Mbps", bits_per_second / 1e6)
}
