use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use neo_backend::config::NeoConfig;
use neo_backend::query::parse_date;
use neo_backend::{NeoDatabase, QueryArgs, extract, limit, logging, write};

#[derive(Parser)]
#[command(name = "neo-backend")]
#[command(about = "Explore near-Earth objects and their close approaches")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// NEO CSV file (overrides the configuration)
    #[arg(long, global = true)]
    neofile: Option<PathBuf>,

    /// Close approach JSON file (overrides the configuration)
    #[arg(long, global = true)]
    cadfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one NEO by designation or by name
    Inspect(InspectArgs),

    /// Search close approaches matching every given filter
    Query(QueryCommand),
}

#[derive(Args)]
struct InspectArgs {
    /// Primary designation, e.g. 433
    #[arg(short, long, required_unless_present = "name", conflicts_with = "name")]
    pdes: Option<String>,

    /// IAU name, e.g. Eros (case-insensitive)
    #[arg(short, long)]
    name: Option<String>,

    /// Also print every close approach of the NEO
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct QueryCommand {
    /// Only approaches on this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Only approaches on or after this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// Only approaches on or before this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    /// Minimum approach distance in au
    #[arg(long = "min-distance")]
    distance_min: Option<f64>,

    /// Maximum approach distance in au
    #[arg(long = "max-distance")]
    distance_max: Option<f64>,

    /// Minimum relative velocity in km/s
    #[arg(long = "min-velocity")]
    velocity_min: Option<f64>,

    /// Maximum relative velocity in km/s
    #[arg(long = "max-velocity")]
    velocity_max: Option<f64>,

    /// Minimum NEO diameter in km
    #[arg(long = "min-diameter")]
    diameter_min: Option<f64>,

    /// Maximum NEO diameter in km
    #[arg(long = "max-diameter")]
    diameter_max: Option<f64>,

    /// Only potentially hazardous NEOs
    #[arg(long, conflicts_with = "not_hazardous")]
    hazardous: bool,

    /// Only NEOs known not to be potentially hazardous
    #[arg(long)]
    not_hazardous: bool,

    /// Maximum number of results (0 for no limit)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Write results to a .csv or .json file instead of stdout
    #[arg(short, long)]
    outfile: Option<PathBuf>,
}

impl QueryCommand {
    fn query_args(&self) -> QueryArgs {
        let hazardous = match (self.hazardous, self.not_hazardous) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        QueryArgs {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
            distance_min: self.distance_min,
            distance_max: self.distance_max,
            velocity_min: self.velocity_min,
            velocity_max: self.velocity_max,
            diameter_min: self.diameter_min,
            diameter_max: self.diameter_max,
            hazardous,
        }
    }
}

fn load_database(neo_file: &Path, cad_file: &Path) -> Result<NeoDatabase> {
    let neos = extract::load_neos(neo_file)
        .with_context(|| format!("Failed to load NEOs from {}", neo_file.display()))?;
    let approaches = extract::load_approaches(cad_file)
        .with_context(|| format!("Failed to load close approaches from {}", cad_file.display()))?;
    NeoDatabase::from_collections(neos, approaches).context("Failed to build NEO database")
}

fn inspect(db: &NeoDatabase, args: &InspectArgs) -> ExitCode {
    let neo = match (&args.pdes, &args.name) {
        (Some(pdes), _) => db.get_neo_by_designation(pdes),
        (None, Some(name)) => db.get_neo_by_name(name),
        (None, None) => None,
    };

    let Some(neo) = neo else {
        eprintln!("No matching NEOs exist in the database.");
        return ExitCode::FAILURE;
    };

    println!("{}", neo);
    if args.verbose {
        for approach in db.approaches_of(neo) {
            println!("- {}", approach);
        }
    }
    ExitCode::SUCCESS
}

fn query(db: &NeoDatabase, command: &QueryCommand, default_limit: Option<usize>) -> Result<ExitCode> {
    let filters = command.query_args().to_filters();
    tracing::debug!("Running query with {} filters", filters.len());

    let results = limit(db.query(&filters), command.limit.or(default_limit));

    match &command.outfile {
        Some(path) => {
            let count = write::write_results(results, path)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            tracing::info!("Query matched {} close approaches", count);
        }
        None => {
            let mut count = 0;
            for approach in results {
                println!("{}", approach);
                count += 1;
            }
            tracing::info!("Query matched {} close approaches", count);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = NeoConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to read config file {}", cli.config.display()))?;

    let _logging_guard = logging::init_logging(&config.log_dir, "neo-backend", &config.log_level)
        .context("Failed to initialize logging")?;

    let neo_file = cli.neofile.unwrap_or_else(|| config.neo_file.clone());
    let cad_file = cli.cadfile.unwrap_or_else(|| config.cad_file.clone());
    let db = load_database(&neo_file, &cad_file)?;

    match &cli.command {
        Commands::Inspect(args) => Ok(inspect(&db, args)),
        Commands::Query(command) => query(&db, command, config.default_limit),
    }
}
