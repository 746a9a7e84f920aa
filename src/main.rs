//! Annuity Illustration CLI
//!
//! Command-line interface for running MYGA and FIA illustrations

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use annuity_illustration::client::{load_requests, parse_birthday};
use annuity_illustration::format::{format_compact, parse_rows, IllustrationResponse};
use annuity_illustration::projection::IndexReturnModel;
use annuity_illustration::{
    IllustrationConfig, IllustrationRequest, IllustrationRunner, ProductConstants, ProductType,
};

#[derive(Parser)]
#[command(name = "annuity_illustration", version, about = "MYGA and FIA annuity illustrations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one illustration from a JSON request
    Illustrate {
        /// Request payload (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Override the request's product type
        #[arg(long)]
        product: Option<ProductArg>,

        /// Constants: a JSON document or a directory of CSV tables
        #[arg(long)]
        constants: Option<PathBuf>,

        /// Seed for the FIA index return stub
        #[arg(long)]
        seed: Option<u64>,

        /// Calculation date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Run every client in a CSV file
    Batch {
        #[arg(long)]
        input: PathBuf,

        /// Override every row's product type
        #[arg(long)]
        product: Option<ProductArg>,

        #[arg(long)]
        constants: Option<PathBuf>,

        #[arg(long)]
        as_of: Option<String>,
    },
    /// Print the default product constants as JSON
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProductArg {
    Myga,
    Fia,
}

impl From<ProductArg> for ProductType {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::Myga => ProductType::Myga,
            ProductArg::Fia => ProductType::Fia,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn load_constants(path: Option<&PathBuf>) -> Result<ProductConstants> {
    match path {
        None => Ok(ProductConstants::default()),
        Some(path) if path.is_dir() => ProductConstants::from_csv_dir(path)
            .with_context(|| format!("loading constants from {}", path.display())),
        Some(path) => ProductConstants::from_json_path(path)
            .with_context(|| format!("loading constants from {}", path.display())),
    }
}

fn parse_as_of(as_of: Option<&str>) -> Result<Option<NaiveDate>> {
    as_of
        .map(|text| parse_birthday(text).with_context(|| format!("invalid --as-of date '{}'", text)))
        .transpose()
}

fn print_table(response: &IllustrationResponse) {
    let calc = &response.illustration_calc_data;

    println!("Illustration ({} years, client age {}):", calc.durations, calc.age);
    println!("{:>4} {:>4} {:>16} {:>14} {:>18} {:>18}",
        "Year", "Age", "Premium", "Withdrawal", "Accum Value", "Surrender Value");
    println!("{}", "-".repeat(80));

    for row in &calc.data {
        println!("{:>4} {:>4} {:>16} {:>14} {:>18} {:>18}", row.0, row.1, row.2, row.3, row.4, row.5);
    }

    if let Some(maturity) = calc.accumulation_value_at_maturity.first() {
        println!("\nAccumulation value at maturity: {}", maturity);
    }
}

fn illustrate(
    input: PathBuf,
    product: Option<ProductArg>,
    constants: Option<PathBuf>,
    seed: Option<u64>,
    as_of: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
    let mut request: IllustrationRequest =
        serde_json::from_str(&text).with_context(|| format!("parsing request {}", input.display()))?;
    if let Some(product) = product {
        request.product_type = Some(product.into());
    }

    let mut config = IllustrationConfig {
        as_of: parse_as_of(as_of.as_deref())?,
        ..Default::default()
    };
    if let Some(seed) = seed {
        config.index_returns = IndexReturnModel::Stochastic { seed };
    }

    let runner = IllustrationRunner::with_constants(load_constants(constants.as_ref())?).with_config(config);
    let response = runner.run(&request).context("illustration failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Table => print_table(&response),
    }

    Ok(())
}

fn batch(
    input: PathBuf,
    product: Option<ProductArg>,
    constants: Option<PathBuf>,
    as_of: Option<String>,
) -> Result<()> {
    let start = Instant::now();
    let mut clients = load_requests(&input).with_context(|| format!("loading clients from {}", input.display()))?;
    println!("Loaded {} clients in {:?}", clients.len(), start.elapsed());

    if let Some(product) = product {
        for (_, request) in clients.iter_mut() {
            request.product_type = Some(product.into());
        }
    }

    let config = IllustrationConfig {
        as_of: parse_as_of(as_of.as_deref())?,
        ..Default::default()
    };
    let runner = IllustrationRunner::with_constants(load_constants(constants.as_ref())?).with_config(config);

    let requests: Vec<IllustrationRequest> = clients.iter().map(|(_, r)| r.clone()).collect();
    let run_start = Instant::now();
    let results = runner.run_batch(&requests);
    println!("Ran {} illustrations in {:?}\n", results.len(), run_start.elapsed());

    println!("{:<12} {:>6} {:>6} {:>6} {:>14} {:>14}",
        "Client", "Prod", "Age", "Years", "Final AV", "Final SV");
    println!("{}", "-".repeat(64));

    let mut failures = 0;
    for ((client_id, request), result) in clients.iter().zip(results) {
        let product = request.product_type.map(|p| p.to_string()).unwrap_or_default();
        match result {
            Ok(response) => {
                let calc = &response.illustration_calc_data;
                let last = parse_rows(&calc.data).pop();
                let (av, sv) = last
                    .map(|row| (format_compact(row.accumulation_value), format_compact(row.surrender_value)))
                    .unwrap_or_default();
                println!("{:<12} {:>6} {:>6} {:>6} {:>14} {:>14}",
                    client_id, product, calc.age, calc.durations, av, sv);
            }
            Err(e) => {
                failures += 1;
                println!("{:<12} {:>6} error: {}", client_id, product, e);
            }
        }
    }

    if failures > 0 {
        println!("\n{} of {} clients failed", failures, clients.len());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Illustrate { input, product, constants, seed, as_of, format } => {
            illustrate(input, product, constants, seed, as_of, format)
        }
        Commands::Batch { input, product, constants, as_of } => batch(input, product, constants, as_of),
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&ProductConstants::default())?);
            Ok(())
        }
    }
}
