use anyhow::{Context, Result};
use clap::Parser;
use fragrance_warehouse::config::{AppConfig, CliConfig, FileConfig, DEFAULT_ENCODING};
use fragrance_warehouse::pipeline;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fragrance-etl")]
#[command(about = "Load the fragrance catalog CSV into a SQLite star schema")]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the cleaned source CSV.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Zip archive to extract the source CSV from. Takes precedence over --source.
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Name of the CSV inside the archive (default: fra_cleaned.csv).
    #[arg(long)]
    pub archive_entry: Option<String>,

    /// Directory the archive is extracted into (default: next to the archive).
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Path to the SQLite warehouse file. Created if missing.
    #[arg(long)]
    pub warehouse: Option<PathBuf>,

    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// Source encoding label, e.g. latin1 or utf-8.
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Also write the run summary as JSON to this path.
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            source: args.source.clone(),
            archive: args.archive.clone(),
            archive_entry: args.archive_entry.clone(),
            work_dir: args.work_dir.clone(),
            warehouse: args.warehouse.clone(),
            delimiter: args.delimiter,
            encoding: args.encoding.clone(),
            summary_json: args.summary_json.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)
        .context("Failed to resolve configuration")?;

    info!("Fragrance ETL");
    info!("=============");
    info!("Source: {:?}", config.source);
    info!("Warehouse: {}", config.warehouse.display());

    let summary = pipeline::run(&config).context("ETL run failed")?;

    info!("");
    info!(
        "Load completed: {} perfumes written",
        summary.write.rows_written("perfumes").unwrap_or(0)
    );
    Ok(())
}
