use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use savings_cli::csv_loader;
use savings_cli::form::CalculatorForm;
use savings_cli::logging::{self, LogOptions};
use savings_cli::report::{self, OutputFormat};
use savings_cli::settings::Settings;
use savings_core::{CalculatorInputs, Feature, FeatureToggles, SavingsCalculator};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Estimates the monthly savings a practice gains from automating reminders,
/// waitlists, rescheduling and fee collection.
///
/// Every run compares the practice without automation against the same
/// practice with the selected automations switched on.
#[derive(Debug, Parser)]
#[command(name = "savings-calculator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (overrides RUST_LOG and the settings file).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute one scenario from the reference defaults plus overrides.
    Compute(ComputeArgs),

    /// Compute every scenario in a CSV file.
    Batch {
        /// CSV file with one scenario per row.
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the features and the adjustments they drive, in application order.
    Features,
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Override an input, e.g. `--set active_patients=300` or
    /// `--set automated_waitlist=off`. Repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    assignments: Vec<String>,

    /// Switch a feature on. Repeatable.
    #[arg(long, value_name = "FEATURE", value_parser = parse_feature)]
    enable: Vec<Feature>,

    /// Switch a feature off. Repeatable.
    #[arg(long, value_name = "FEATURE", value_parser = parse_feature)]
    disable: Vec<Feature>,

    /// Start with every feature off; combine with `--enable`.
    #[arg(long, default_value_t = false)]
    no_features: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn parse_feature(s: &str) -> Result<Feature, String> {
    Feature::parse(s).ok_or_else(|| {
        let known: Vec<&str> = Feature::ALL.iter().map(Feature::as_str).collect();
        format!("unknown feature '{s}' (expected one of: {})", known.join(", "))
    })
}

// ─── startup ─────────────────────────────────────────────────────────────────

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// `--log-level`/`--log-file` win over the settings file.
fn log_options<'a>(
    cli: &'a Cli,
    settings: &'a Settings,
) -> LogOptions<'a> {
    LogOptions {
        level: cli.log_level.as_deref().or(settings.logging.level.as_deref()),
        file: cli.log_file.as_deref().or(settings.logging.file.as_deref()),
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_compute(
    calculator: SavingsCalculator,
    args: &ComputeArgs,
) -> Result<()> {
    let mut features = if args.no_features {
        FeatureToggles::none()
    } else {
        FeatureToggles::all()
    };
    for feature in &args.enable {
        features.set(*feature, true);
    }
    for feature in &args.disable {
        features.set(*feature, false);
    }

    let inputs = CalculatorInputs::default().with_features(features);
    let mut form = CalculatorForm::with_inputs(calculator, inputs);
    for assignment in &args.assignments {
        form.apply_assignment(assignment)
            .with_context(|| format!("Rejected --set {assignment}"))?;
    }

    let output = match args.format {
        OutputFormat::Text => report::render_text(None, form.inputs(), form.results()),
        OutputFormat::Json => report::render_json(None, form.inputs(), form.results())
            .context("Failed to serialize results")?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn run_batch(
    calculator: &SavingsCalculator,
    file: &Path,
    format: OutputFormat,
) -> Result<()> {
    let scenarios = csv_loader::load_from_file(file)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to load scenarios: {}", file.display()))?;
    info!(count = scenarios.len(), file = %file.display(), "Loaded scenarios");

    let results: Vec<_> = scenarios
        .iter()
        .map(|scenario| calculator.calculate(&scenario.inputs))
        .collect();

    match format {
        OutputFormat::Text => {
            let reports: Vec<String> = scenarios
                .iter()
                .zip(&results)
                .map(|(scenario, results)| {
                    report::render_text(Some(&scenario.name), &scenario.inputs, results)
                })
                .collect();
            println!("{}", reports.join("\n").trim_end());
        }
        OutputFormat::Json => {
            let json = report::render_json_batch(
                scenarios
                    .iter()
                    .zip(&results)
                    .map(|(scenario, results)| {
                        (scenario.name.as_str(), &scenario.inputs, results)
                    }),
            )
            .context("Failed to serialize results")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_features() {
    println!("Features");
    for feature in Feature::ALL {
        println!("  {:<20} {}", feature.as_str(), feature.label());
    }
    println!();
    println!("Adjustments (applied in this order)");
    print!("{}", report::render_adjustments(&FeatureToggles::all()));
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    logging::init_logging(log_options(&cli, &settings))?;
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "Using settings file");
    }

    let config = settings.calculator_config()?;
    debug!(visit_baseline = %config.monthly_visit_baseline, "Using model configuration");
    let calculator = SavingsCalculator::new(config)?;

    match &cli.command {
        Command::Compute(args) => run_compute(calculator, args),
        Command::Batch { file, format } => run_batch(&calculator, file, *format),
        Command::Features => {
            run_features();
            Ok(())
        }
    }
}
