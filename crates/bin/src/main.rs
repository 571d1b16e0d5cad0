//! Uplift CLI binary.
//!
//! Loads the sales and product CSVs, builds the training table, and writes it
//! back out as CSV.

mod integration;

use clap::{Parser, Subcommand};
use integration::tables::{
    TableError, load_config, read_table, split_list, write_intermediates, write_table,
};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uplift::{available_stages, run_pipeline};

#[derive(Parser)]
#[command(name = "uplift")]
#[command(about = "Uplift: daily training table for markdown models", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the feature table from raw sales and product tables
    Run {
        /// Sales transaction CSV (date, variant, net_amount, gross_amount, purchases)
        #[arg(long)]
        sales: PathBuf,

        /// Product catalog CSV (article plus attribute columns)
        #[arg(long)]
        products: PathBuf,

        /// Output CSV for the feature table
        #[arg(long)]
        output: PathBuf,

        /// Pipeline configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comma separated grouping key for daily aggregation
        #[arg(long)]
        group_by: Option<String>,

        /// Comma separated catalog attributes to attach
        #[arg(long)]
        product_features: Option<String>,

        /// Also write merged, daily and completed tables to this directory
        #[arg(long)]
        intermediate_dir: Option<PathBuf>,
    },

    /// List pipeline stages and the columns they require
    Stages,

    /// Print the default configuration as JSON
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), TableError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sales,
            products,
            output,
            config,
            group_by,
            product_features,
            intermediate_dir,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(keys) = group_by {
                config.daily.group_columns = split_list(&keys);
            }
            if let Some(features) = product_features {
                config.features.product_features = split_list(&features);
            }

            let sales = read_table(&sales)?;
            let products = read_table(&products)?;
            info!(
                sales_rows = sales.height(),
                product_rows = products.height(),
                "Loaded inputs"
            );

            let mut out = run_pipeline(&sales, &products, &config)?;
            if let Some(dir) = intermediate_dir {
                write_intermediates(&mut out, &dir)?;
            }
            write_table(&mut out.features, &output)?;
        }
        Commands::Stages => list_stages(),
        Commands::Config => {
            println!("{}", uplift::PipelineConfig::default().to_json()?);
        }
    }

    Ok(())
}

fn list_stages() {
    println!("{:<4} {:<18} {}", "#", "STAGE", "DESCRIPTION");
    for stage in available_stages() {
        println!("{:<4} {:<18} {}", stage.order, stage.name, stage.description);
        println!("{:<23} requires: {}", "", stage.required_columns.join(", "));
    }
}
