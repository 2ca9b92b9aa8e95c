use analytics::AnalyticsEngine;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::settings::Settings;
use configuration::OutputFormat;
use core_types::{DateRange, FilterState, Granularity, OrderRecord};
use std::path::{Path, PathBuf};

mod output;

/// Configuration file read when `--config` is not given. It may be absent.
const DEFAULT_CONFIG: &str = "config.toml";

/// The main entry point for the Shoplens command-line dashboard.
fn main() -> Result<()> {
    // Load SHOPLENS_* overrides from a .env file if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut settings = configuration::load_config(&config_path, cli.config.is_some())
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    if let Some(data) = &cli.data {
        settings.dataset.path = data.clone();
    }
    let format = cli.format.unwrap_or(settings.output.format);

    // Execute the appropriate command
    match cli.command {
        Commands::Kpis(args) => handle_kpis(args, &settings, format),
        Commands::Series(args) => handle_series(args, settings, format),
        Commands::Segment(args) => handle_segment(args, &settings, format),
        Commands::Dashboard(args) => handle_dashboard(args, &settings, format),
        Commands::Options => handle_options(&settings, format),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales KPIs, chart series and RFM customer segmentation for an order file.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the TOML configuration file [default: config.toml, optional].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// The order file to analyse; overrides `dataset.path`.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output format; overrides `output.format`.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total sales, order and customer counts, average order value.
    Kpis(FilterArgs),
    /// Sales trend, top products and revenue by country.
    Series(SeriesArgs),
    /// RFM scores and segment of every customer.
    Segment(SegmentArgs),
    /// KPIs, series and segmentation in one pass.
    Dashboard(DashboardArgs),
    /// Countries, products and the date span available for filtering.
    Options,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep only these countries (repeatable).
    #[arg(long = "country")]
    countries: Vec<String>,

    /// Keep only these products (repeatable).
    #[arg(long = "product")]
    products: Vec<String>,

    /// First order date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last order date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    /// Builds the filter; a single bound leaves the other side open.
    fn to_filter(&self) -> Result<FilterState> {
        let date_range = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some(
                DateRange::new(from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))
                    .context("Invalid --from/--to range")?,
            ),
        };

        let filter = FilterState {
            countries: self.countries.clone(),
            products: self.products.clone(),
            date_range,
        };
        filter.validate().context("Invalid filter")?;
        Ok(filter)
    }
}

#[derive(Args)]
struct SeriesArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Trend bucket size: day, week or month.
    #[arg(long)]
    granularity: Option<Granularity>,

    /// How many products to rank.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Args)]
struct SegmentArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Date recency is measured from (format: YYYY-MM-DD) [default: latest order].
    #[arg(long)]
    analysis_date: Option<NaiveDate>,

    /// Rows shown in the table preview.
    #[arg(long)]
    limit: Option<usize>,

    /// Write every customer row to this CSV file.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args)]
struct DashboardArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Date recency is measured from (format: YYYY-MM-DD) [default: latest order].
    #[arg(long)]
    analysis_date: Option<NaiveDate>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load_records(settings: &Settings) -> Result<Vec<OrderRecord>> {
    let path: &Path = &settings.dataset.path;
    let outcome = dataset::load_orders(path, &settings.dataset)
        .with_context(|| format!("Failed to load orders from {}", path.display()))?;

    if outcome.skipped() > 0 {
        tracing::warn!(
            skipped = outcome.skipped(),
            rows = outcome.rows_read(),
            "Some order rows were malformed and have been skipped."
        );
    }
    Ok(outcome.records)
}

fn handle_kpis(args: FilterArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let filter = args.to_filter()?;
    let records = load_records(settings)?;
    let engine = AnalyticsEngine::new(&settings.analytics)?;

    let kpis = engine.compute(&records, &filter)?;
    output::print_kpis(&kpis, format)
}

fn handle_series(args: SeriesArgs, mut settings: Settings, format: OutputFormat) -> Result<()> {
    if let Some(granularity) = args.granularity {
        settings.analytics.series.granularity = granularity;
    }
    if let Some(top) = args.top {
        settings.analytics.series.top_products = top;
    }

    let filter = args.filter.to_filter()?;
    let records = load_records(&settings)?;
    let engine = AnalyticsEngine::new(&settings.analytics)?;

    let series = engine.series(&records, &filter)?;
    output::print_series(&series, format)
}

fn handle_segment(args: SegmentArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let filter = args.filter.to_filter()?;
    let records = load_records(settings)?;
    let engine = AnalyticsEngine::new(&settings.analytics)?;

    let report = engine.segmentation_report(&records, &filter, args.analysis_date)?;

    if let Some(path) = &args.export {
        output::export_customers(&report.customers, path)
            .with_context(|| format!("Failed to export segmentation to {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            customers = report.customers.len(),
            "Segmentation exported."
        );
    }

    let limit = args
        .limit
        .or(settings.output.preview_rows)
        .unwrap_or(output::DEFAULT_PREVIEW_ROWS);
    output::print_segmentation(&report, limit, format)
}

fn handle_dashboard(args: DashboardArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let filter = args.filter.to_filter()?;
    let records = load_records(settings)?;
    let engine = AnalyticsEngine::new(&settings.analytics)?;

    let report = engine.dashboard(&records, &filter, args.analysis_date)?;
    let limit = settings
        .output
        .preview_rows
        .unwrap_or(output::DEFAULT_PREVIEW_ROWS);
    output::print_dashboard(&report, limit, format)
}

fn handle_options(settings: &Settings, format: OutputFormat) -> Result<()> {
    let records = load_records(settings)?;
    let engine = AnalyticsEngine::new(&settings.analytics)?;
    output::print_options(&engine.filter_options(&records), format)
}
