use anyhow::Context;
use clap::ValueEnum;
use netvisorcore::charts::format_throughput;
use netvisorcore::export::{total_handovers, ExportDocument};
use netvisorcore::history::{summarize, HistoryEntry};
use netvisorcore::math::StatsHelper;
use netvisorcore::{SimulationId, SimulationParameters, SimulationResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Writes `doc` to `path`, or to `<simulationId>.<ext>` in the working
/// directory when no path is given. Returns the path written.
pub fn write_export(
    doc: &ExportDocument,
    format: ExportFormat,
    path: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(doc.file_name(format.extension())));
    let contents = match format {
        ExportFormat::Json => doc.to_json(),
        ExportFormat::Csv => doc.to_csv(),
    }
    .with_context(|| format!("rendering {} export", format.extension()))?;
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, contents)
        .with_context(|| format!("writing export {}", target.display()))?;
    log::info!("exported {} to {}", doc.metadata.simulation_id, target.display());
    Ok(target)
}

/// Per-user headline figures as printable rows.
pub fn user_rows(result: &SimulationResult) -> Vec<String> {
    (0..result.user_count())
        .map(|user| {
            let throughput = result
                .users_throughput
                .get(user)
                .map(|s| StatsHelper::mean(s))
                .unwrap_or(0.0);
            let per = result
                .users_per
                .get(user)
                .map(|s| StatsHelper::mean(s))
                .unwrap_or(0.0);
            let collisions: f64 = result.users_collision.get(user).map_or(0.0, |s| s.iter().sum());
            let retries: f64 = result.users_retries.get(user).map_or(0.0, |s| s.iter().sum());
            let handovers = result
                .users_handover
                .get(user)
                .map_or(0, |s| StatsHelper::transitions(s));
            format!(
                "  User {:<3} throughput {:>12}  PER {:.4}  collisions {:>4}  retries {:>4}  handovers {}",
                user + 1,
                format_throughput(throughput),
                per,
                collisions,
                retries,
                handovers
            )
        })
        .collect()
}

pub fn print_result(id: &SimulationId, params: &SimulationParameters, result: &SimulationResult) {
    println!("{} -> {}", id, summarize(params, result));
    if let Some(error) = &result.error {
        println!("  error: {}", error);
        return;
    }
    if !result.has_series() {
        println!("  no data returned");
        return;
    }
    let span = StatsHelper::min_max(&result.time)
        .map(|(lo, hi)| format!("{}s..{}s", lo, hi))
        .unwrap_or_default();
    println!(
        "  steps {} ({}), users {}, handovers {}, collisions {}, retries {}",
        result.step_count(),
        span,
        result.user_count(),
        total_handovers(result),
        StatsHelper::sum_nested(&result.users_collision),
        StatsHelper::sum_nested(&result.users_retries)
    );
    for row in user_rows(result) {
        println!("{}", row);
    }
}

pub fn print_history_line(entry: &HistoryEntry) {
    println!("{}  {:>15}  {}", entry.id, entry.timestamp, entry.summary);
}

pub fn print_parameters(params: &SimulationParameters) {
    for (field, value) in params.display_fields() {
        println!("  {:<22} {}", field, value);
    }
}
