use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use housing::{
    init_logging, merge_tables, put_with_retry, read_labelled, read_table, render_chart, serve,
    write_table, AppState, ChartKind, ChartOptions, ChartSeries, FeatureRow, HousingModel,
    MergeSource, ServiceConfig, Table, Trendline, CENSUS_KEY_FIELDS, HOUSING_VALUE_COLUMN,
    MUNICIPAL_CODE_COLUMN, PER_CAPITA_INCOME_COLUMN,
};
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::ObjectStore;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "housing")]
#[command(about = "Housing value prediction API and census dataset tools")]
struct Cli {
    /// Data directory, overrides HOUSING_DATA_DIR
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartStyle {
    Line,
    Bar,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(short = 'b', long)]
        host: Option<String>,
    },
    /// Merge per-year census responses into one table
    Merge {
        /// YEAR=PATH pairs, paths relative to the data directory
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,

        /// Zillow home value exports with bare year columns, joined after the census years
        #[arg(short, long)]
        zillow: Vec<String>,

        /// Output path ending in .csv or .parquet
        #[arg(short, long)]
        output: String,
    },
    /// Fit the housing value model from a merged dataset
    Train {
        #[arg(long)]
        dataset: String,

        #[arg(short, long)]
        year: u16,

        /// Artifact path, defaults to HOUSING_MODEL_PATH
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render one metric across years as an SVG chart
    Chart {
        #[arg(long)]
        dataset: String,

        /// Column label without the year suffix, e.g. "Per Capita Income"
        #[arg(short, long)]
        metric: String,

        #[arg(long, required = true, num_args = 1..)]
        years: Vec<u16>,

        #[arg(short, long, value_enum, default_value = "line")]
        style: ChartStyle,

        #[arg(long)]
        trendline: bool,

        #[arg(short, long)]
        output: String,
    },
}

fn ensure_data_dir(data_dir: &PathBuf) -> Result<()> {
    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir)?;
        info!("Created directory: {:?}", data_dir);
    }
    Ok(())
}

fn parse_input(raw: &str) -> Result<MergeSource> {
    let (year, path) = raw
        .split_once('=')
        .with_context(|| format!("Expected YEAR=PATH, got {}", raw))?;
    let year = year
        .trim()
        .parse()
        .with_context(|| format!("Invalid year in {}", raw))?;
    Ok(MergeSource::Census {
        year,
        path: Path::from(path.trim()),
    })
}

async fn run_merge(
    store: &Arc<dyn ObjectStore>,
    inputs: &[String],
    zillow: &[String],
    output: &str,
) -> Result<()> {
    let mut sources = inputs
        .iter()
        .map(|raw| parse_input(raw))
        .collect::<Result<Vec<_>>>()?;
    sources.extend(zillow.iter().map(|path| MergeSource::Zillow {
        path: Path::from(path.as_str()),
    }));

    let mut tables = Vec::with_capacity(sources.len());
    for source in &sources {
        tables.push(read_labelled(store, source).await?);
    }

    let merged = merge_tables(&tables, &CENSUS_KEY_FIELDS)?;
    info!(
        "Merged {} tables into {} rows and {} columns",
        tables.len(),
        merged.len(),
        merged.columns().len()
    );

    write_table(store, &Path::from(output), &merged).await?;
    Ok(())
}

fn training_rows(table: &Table, year: u16) -> Result<(Vec<FeatureRow>, Vec<f64>)> {
    let counties = table.numeric_column(MUNICIPAL_CODE_COLUMN)?;
    let incomes = table.numeric_column(&format!("{} {}", PER_CAPITA_INCOME_COLUMN, year))?;
    let values = table.numeric_column(&format!("{} {}", HOUSING_VALUE_COLUMN, year))?;

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut skipped = 0usize;

    for ((county, income), value) in counties.into_iter().zip(incomes).zip(values) {
        match (county, income, value) {
            (Some(county), Some(income), Some(value)) => {
                rows.push(FeatureRow::new(county, income));
                targets.push(value);
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} rows with missing values", skipped);
    }
    Ok((rows, targets))
}

async fn run_train(
    store: &Arc<dyn ObjectStore>,
    dataset: &str,
    year: u16,
    output: &str,
) -> Result<()> {
    let table = read_table(store, &Path::from(dataset)).await?;
    let (rows, targets) = training_rows(&table, year)?;

    let target = format!("{} {}", HOUSING_VALUE_COLUMN, year);
    let model = HousingModel::fit(&rows, &targets, &target)?;
    model.save(store, &Path::from(output)).await?;
    Ok(())
}

async fn run_chart(
    store: &Arc<dyn ObjectStore>,
    dataset: &str,
    metric: &str,
    years: &[u16],
    style: ChartStyle,
    trendline: bool,
    output: &str,
) -> Result<()> {
    let table = read_table(store, &Path::from(dataset)).await?;
    let columns: Vec<String> = years.iter().map(|y| format!("{} {}", metric, y)).collect();
    let series = ChartSeries::from_table(&table, "Name", &columns)?;
    let x_values: Vec<f64> = years.iter().map(|&y| f64::from(y)).collect();

    let trend = if trendline {
        let (xs, ys): (Vec<f64>, Vec<f64>) = series
            .iter()
            .flat_map(|s| x_values.iter().zip(&s.values).filter_map(|(&x, y)| y.map(|y| (x, y))))
            .unzip();
        Trendline::fit(&xs, &ys)
    } else {
        None
    };

    let kind = match style {
        ChartStyle::Line => ChartKind::Line,
        ChartStyle::Bar => ChartKind::Bar,
    };
    let options = ChartOptions::new(metric, "Year", metric);
    let svg = render_chart(kind, &series, &x_values, &options, trend.as_ref())?;

    put_with_retry(store, &Path::from(output), svg.into_bytes()).await?;
    info!("Wrote chart to {}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse command line arguments
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    let mut config = ServiceConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    ensure_data_dir(&config.data_dir)?;

    // Initialize object store
    let store: Arc<dyn ObjectStore> =
        Arc::new(LocalFileSystem::new_with_prefix(&config.data_dir)?);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);

            info!(
                "Starting API server using model {} from {:?}",
                config.model_path, config.data_dir
            );
            serve(host, port, AppState::new(store, config.model_path.as_str())).await?;
        }
        Commands::Merge { input, zillow, output } => {
            info!("Merging {} census tables and {} Zillow tables", input.len(), zillow.len());
            run_merge(&store, &input, &zillow, &output).await?;
        }
        Commands::Train { dataset, year, output } => {
            let output = output.unwrap_or(config.model_path);
            info!("Training housing value model for {}", year);
            run_train(&store, &dataset, year, &output).await?;
        }
        Commands::Chart { dataset, metric, years, style, trendline, output } => {
            run_chart(&store, &dataset, &metric, &years, style, trendline, &output).await?;
        }
    }

    Ok(())
}
