use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use netvisorcore::export::ExportDocument;
use netvisorcore::form::presets::presets_for;
use netvisorcore::form::PresetField;
use netvisorcore::history::HistoryEntry;
use netvisorcore::model::ENVIRONMENTS;
use netvisorcore::{PresenterState, SimulationId, SimulationParameters};
use report::ExportFormat;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::{load_parameters, ClientConfig};
use workflow::runner::{build_parameters, Overrides, RunReport, Runner};

mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Command-line client for the wireless simulation service")]
struct Cli {
    /// Client config file (YAML); defaults to the per-user config when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured service URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a simulation and print the results
    Run(RunArgs),
    /// Inspect and manage past runs
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// List the parameter presets and propagation environments
    Presets,
}

#[derive(Args)]
struct RunArgs {
    /// Parameter file (YAML, service field names); defaults apply otherwise
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long)]
    nodes: Option<u32>,
    #[arg(long)]
    aps: Option<usize>,
    /// Environment label, sets the path-loss exponent
    #[arg(long)]
    environment: Option<String>,
    /// Apply a preset, as `field=label` (repeatable)
    #[arg(long = "preset")]
    presets: Vec<String>,
    /// Set a scalar parameter, as `wireName=value` (repeatable)
    #[arg(long = "set")]
    scalars: Vec<String>,
    #[arg(long)]
    export_json: Option<PathBuf>,
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Most recent first
    List,
    Show { id: String },
    /// Present a stored run again without contacting the service
    Replay { id: String },
    Export {
        id: String,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Clear,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("loading client config")?;
    config.apply_overrides(cli.api_url, None);
    log::debug!("using {} with history in {}", config.api_url, config.history_dir.display());

    match cli.command {
        Command::Run(args) => run(config, args),
        Command::History { command } => history(config, command),
        Command::Presets => {
            list_presets();
            Ok(())
        }
    }
}

fn run(config: ClientConfig, args: RunArgs) -> anyhow::Result<()> {
    let base = match &args.params {
        Some(path) => load_parameters(path)?,
        None => SimulationParameters::default(),
    };
    let overrides = Overrides {
        nodes: args.nodes,
        access_points: args.aps,
        environment: args.environment,
        presets: args.presets,
        scalars: args.scalars,
    };
    let params = build_parameters(&base, &overrides)?;

    let mut runner = Runner::new(config);
    let backend = runner.backend()?;
    log::info!("submitting to {}", backend.endpoint());

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for the simulation request")?;
    let outcome = runtime.block_on(runner.execute(&backend, params));

    print_report(&outcome);
    if outcome.state == PresenterState::Idle {
        return Err(anyhow!("simulation {} was aborted", outcome.simulation_id));
    }

    let exports = [
        (ExportFormat::Json, args.export_json),
        (ExportFormat::Csv, args.export_csv),
    ];
    for (format, path) in exports {
        if let Some(path) = path {
            let doc = export_document(&outcome)?;
            let written = report::write_export(&doc, format, Some(&path))?;
            println!("wrote {}", written.display());
        }
    }
    Ok(())
}

fn export_document(run: &RunReport) -> anyhow::Result<ExportDocument> {
    let result = run
        .result
        .clone()
        .ok_or_else(|| anyhow!("no result to export for {}", run.simulation_id))?;
    Ok(ExportDocument::new(
        run.simulation_id.clone(),
        run.parameters.clone(),
        result,
    ))
}

fn print_report(run: &RunReport) {
    match &run.result {
        Some(result) => {
            report::print_result(&run.simulation_id, &run.parameters, result);
            if run.recorded {
                println!("  saved to history");
            }
        }
        None => println!("{} -> no result", run.simulation_id),
    }
}

fn history(config: ClientConfig, command: HistoryCommand) -> anyhow::Result<()> {
    let mut runner = Runner::new(config);

    match command {
        HistoryCommand::List => {
            if runner.history().is_empty() {
                println!("No simulation history yet");
            }
            for entry in runner.history().entries() {
                report::print_history_line(entry);
            }
        }
        HistoryCommand::Show { id } => {
            let entry = find_entry(&runner, &id)?;
            report::print_history_line(&entry);
            report::print_parameters(&entry.form_data);
            report::print_result(&entry.id, &entry.form_data, &entry.result);
        }
        HistoryCommand::Replay { id } => {
            let entry = find_entry(&runner, &id)?;
            let replayed = runner.replay(&entry);
            print_report(&replayed);
        }
        HistoryCommand::Export { id, format, output } => {
            let entry = find_entry(&runner, &id)?;
            let doc = ExportDocument::from_entry(&entry);
            let written = report::write_export(&doc, format, output.as_deref())?;
            println!("wrote {}", written.display());
        }
        HistoryCommand::Clear => {
            let count = runner.history().len();
            runner
                .history_mut()
                .clear()
                .context("clearing simulation history")?;
            println!("cleared {} entries", count);
        }
    }
    Ok(())
}

fn find_entry(runner: &Runner, id: &str) -> anyhow::Result<HistoryEntry> {
    runner
        .history()
        .get(&SimulationId::from(id))
        .cloned()
        .ok_or_else(|| anyhow!("no history entry with id {}", id))
}

fn list_presets() {
    for field in PresetField::ALL {
        println!("{}:", field.title());
        for preset in presets_for(field) {
            println!("  {}", preset.label);
        }
    }
    println!("Environments:");
    for environment in ENVIRONMENTS {
        println!(
            "  {:<48} n = {}",
            environment.label, environment.path_loss_exponent
        );
    }
}
