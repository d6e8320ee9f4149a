//! emistat - Philippine emigration statistics engine
//!
//! A CLI over year-ranged, category-keyed emigrant counts: paginated
//! tables, rankings, trends and choropleth colors per dataset, plus record
//! editing and bulk CSV/XLSX uploads into a JSON-file store.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, store, file, unknown dataset, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod geo;
mod ingest;
mod models;
mod report;
mod schema;
mod store;

use analysis::normalizer::{normalize_all, record_from_assignments};
use analysis::{Dataset, Query};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, Command, OutputFormat, RangeArgs, SourceArgs};
use config::{Config, CONFIG_FILE};
use geo::GeoMapper;
use models::{Record, Report, ReportMetadata, View, YearRange};
use schema::{Catalog, CategorySchema};
use std::path::Path;
use store::{JsonStore, Store, UploadOptions};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("emistat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Command failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .emistat.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the data directory, page sizes, map colors and extra datasets.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Everything a command needs besides its own arguments.
struct App {
    args: Args,
    config: Config,
    catalog: Catalog,
    store: JsonStore,
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let mut catalog = Catalog::builtin()?;
    catalog.extend(&config.datasets)?;

    let store = JsonStore::new(config.general.data_dir.clone());
    debug!("Data directory: {}", store.data_dir().display());

    let ctx = App {
        args,
        config,
        catalog,
        store,
    };

    match ctx.args.command.clone() {
        Command::Datasets => handle_datasets(&ctx),
        Command::Overview => handle_overview(&ctx).await,
        Command::Table {
            source,
            range,
            page,
            page_size,
        } => handle_table(&ctx, &source, &range, page, page_size).await,
        Command::Rank {
            source,
            range,
            year,
            top,
        } => handle_rank(&ctx, &source, &range, year, top).await,
        Command::Series {
            source,
            range,
            category,
        } => handle_series(&ctx, &source, &range, category).await,
        Command::Summary {
            source,
            range,
            year,
            category,
            page,
            page_size,
        } => {
            let (dataset, metadata) = load_dataset(&ctx, &source).await?;
            let query = Query {
                range: resolve_range(&ctx, &dataset, &range),
                selector: year,
                category,
                page,
                page_size: page_size.unwrap_or_else(|| ctx.config.page_size_for(dataset.schema())),
            };
            let result = dataset.summary(&query)?;
            emit_report(&ctx, &dataset, metadata, View::Summary(result))
        }
        Command::Map {
            source,
            range,
            year,
            geographies,
        } => handle_map(&ctx, &source, &range, year, geographies.as_deref()).await,
        Command::Add {
            dataset,
            year,
            values,
        } => {
            let schema = ctx.catalog.get(&dataset)?;
            let record = record_from_assignments(schema, year, &values)?;
            let id = ctx.store.create(&schema.collection, &record).await?;
            println!("✅ Created {} record for {}: {}", schema.name, year, id);
            Ok(())
        }
        Command::Update {
            dataset,
            id,
            year,
            values,
        } => {
            let schema = ctx.catalog.get(&dataset)?;
            let record = record_from_assignments(schema, year, &values)?;
            ctx.store.update(&schema.collection, &id, &record).await?;
            println!("✅ Updated {} record {}", schema.name, id);
            Ok(())
        }
        Command::Delete { dataset, id } => {
            let schema = ctx.catalog.get(&dataset)?;
            ctx.store.delete(&schema.collection, &id).await?;
            println!("🗑️  Deleted {} record {}", schema.name, id);
            Ok(())
        }
        Command::Upload { dataset, file } => handle_upload(&ctx, &dataset, &file).await,
        Command::InitConfig => handle_init_config(),
    }
}

fn handle_datasets(ctx: &App) -> Result<()> {
    let output = match ctx.config.general.format {
        OutputFormat::Json => report::generate_catalog_json(&ctx.catalog)?,
        OutputFormat::Markdown => report::generate_catalog_markdown(&ctx.catalog),
    };
    write_output(ctx, &output)
}

async fn handle_overview(ctx: &App) -> Result<()> {
    let overview = analysis::overview(&ctx.store, &ctx.catalog)
        .await
        .context("Failed to load dataset collections")?;

    let output = match ctx.config.general.format {
        OutputFormat::Json => report::generate_overview_json(&overview)?,
        OutputFormat::Markdown => report::generate_overview_markdown(&overview, &ctx.catalog),
    };
    write_output(ctx, &output)
}

async fn handle_table(
    ctx: &App,
    source: &SourceArgs,
    range: &RangeArgs,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let (dataset, metadata) = load_dataset(ctx, source).await?;
    let range = resolve_range(ctx, &dataset, range);
    let page_size = page_size.unwrap_or_else(|| ctx.config.page_size_for(dataset.schema()));

    let page = dataset.table(range, page, page_size);
    emit_report(ctx, &dataset, metadata, View::Table { range, page })
}

async fn handle_rank(
    ctx: &App,
    source: &SourceArgs,
    range: &RangeArgs,
    selector: models::Selector,
    top: Option<usize>,
) -> Result<()> {
    let (dataset, metadata) = load_dataset(ctx, source).await?;
    let range = resolve_range(ctx, &dataset, range);

    let totals = dataset.totals(Some(range), selector);
    let groups = analysis::group_totals(&totals, dataset.schema());
    let mut entries = analysis::ranking(&totals, dataset.schema());
    if let Some(n) = top {
        entries = analysis::top(&entries, n);
    }

    emit_report(
        ctx,
        &dataset,
        metadata,
        View::Ranking {
            selector,
            range,
            entries,
            groups,
        },
    )
}

async fn handle_series(
    ctx: &App,
    source: &SourceArgs,
    range: &RangeArgs,
    category: Option<String>,
) -> Result<()> {
    let (dataset, metadata) = load_dataset(ctx, source).await?;
    let range = resolve_range(ctx, &dataset, range);

    let series = dataset.series(Some(range), category.as_deref())?;
    let yearly_totals = dataset.yearly_totals(Some(range));

    emit_report(
        ctx,
        &dataset,
        metadata,
        View::Series {
            range,
            series,
            yearly_totals,
        },
    )
}

async fn handle_map(
    ctx: &App,
    source: &SourceArgs,
    range: &RangeArgs,
    selector: models::Selector,
    geographies: Option<&Path>,
) -> Result<()> {
    let (dataset, metadata) = load_dataset(ctx, source).await?;
    let schema = dataset.schema();
    let Some(kind) = schema.geography else {
        bail!("Dataset '{}' has no geography to map", schema.name);
    };

    let names = match geographies {
        Some(path) => Some(read_geography_names(path)?),
        None => None,
    };

    let range = resolve_range(ctx, &dataset, range);
    let totals = dataset.totals(Some(range), selector);
    let cells = geo::choropleth(
        &totals,
        schema,
        &GeoMapper::for_kind(kind),
        &ctx.config.map.palette(),
        names.as_deref(),
    )?;

    let unmapped = cells.iter().filter(|c| !c.mapped).count();
    if unmapped > 0 {
        debug!("{} geographies left unmapped", unmapped);
    }

    emit_report(
        ctx,
        &dataset,
        metadata,
        View::Map {
            selector,
            range,
            cells,
        },
    )
}

async fn handle_upload(ctx: &App, dataset: &str, file: &Path) -> Result<()> {
    let schema = ctx.catalog.get(dataset)?;

    // Rejected before reading when the extension is unsupported
    let raws = ingest::parse_file(file)
        .with_context(|| format!("Failed to parse upload file: {}", file.display()))?;

    let (records, skipped): (Vec<Record>, Vec<Record>) = normalize_all(&raws, schema)
        .into_iter()
        .partition(|r| r.year.is_some());
    if !skipped.is_empty() {
        warn!("Skipping {} rows without a valid year", skipped.len());
    }

    if records.is_empty() {
        println!("⚠️  No rows with a valid year in {}. Nothing uploaded.", file.display());
        return Ok(());
    }

    println!(
        "📤 Uploading {} {} records from {}",
        records.len(),
        schema.name,
        file.display()
    );

    let options = UploadOptions {
        batch_size: ctx.config.upload.batch_size,
        show_progress: ctx.config.upload.show_progress && !ctx.args.quiet,
    };
    let report = ctx
        .store
        .bulk_create(&schema.collection, &records, &options)
        .await?;

    println!("\n📊 Upload Summary:");
    println!("   Records written: {}", report.records_written);
    println!("   Chunks committed: {}", report.chunks);
    if !skipped.is_empty() {
        println!("   Rows skipped (no year): {}", skipped.len());
    }
    println!("\n✅ Upload complete!");
    Ok(())
}

/// Read the dataset from `--file` or from its store collection.
async fn load_dataset(ctx: &App, source: &SourceArgs) -> Result<(Dataset, ReportMetadata)> {
    let schema: CategorySchema = ctx.catalog.get(&source.dataset)?.clone();

    let (raws, origin) = match source.file {
        Some(ref path) => {
            let raws = ingest::parse_file(path)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            (raws, path.display().to_string())
        }
        None => {
            let raws = ctx
                .store
                .fetch_all(&schema.collection)
                .await
                .with_context(|| format!("Failed to read collection '{}'", schema.collection))?;
            let origin = ctx
                .store
                .data_dir()
                .join(format!("{}.json", schema.collection))
                .display()
                .to_string();
            (raws, origin)
        }
    };

    let dataset = Dataset::from_raw(schema, &raws);
    let metadata = ReportMetadata {
        dataset: dataset.schema().name.clone(),
        source: origin,
        records_loaded: dataset.records().len(),
        records_without_year: dataset.records_without_year(),
        generated_at: Utc::now(),
    };

    info!(
        "Loaded {} records for '{}'",
        metadata.records_loaded, metadata.dataset
    );
    Ok((dataset, metadata))
}

/// CLI bounds first, then config bounds, then the observed years.
fn resolve_range(ctx: &App, dataset: &Dataset, range: &RangeArgs) -> YearRange {
    let from = range.from.or(ctx.config.range.from);
    let to = range.to.or(ctx.config.range.to);
    dataset.range_or_observed(from, to)
}

fn read_geography_names(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read geographies file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

fn emit_report(ctx: &App, dataset: &Dataset, metadata: ReportMetadata, view: View) -> Result<()> {
    let report = Report { metadata, view };

    let output = match ctx.config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, dataset.schema()),
    };

    write_output(ctx, &output)
}

/// Print to stdout, or save to `--output`.
fn write_output(ctx: &App, output: &str) -> Result<()> {
    match ctx.args.output {
        Some(ref path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}
