//! `shipcalc` CLI — quote carrier shipping costs from a tariff document.
//!
//! Usage:
//!   shipcalc quote     --country FR (--qty N | --cart <json|file> | --weight G) [--home] [--json]
//!   shipcalc countries [--json]
//!   shipcalc validate  --country FR --weight G
//!   shipcalc tariff check <file>
//!
//! The tariff comes from `--tariff`, then `SHIPPING_TARIFF_PATH`, then the
//! copy bundled with the library.

mod quote;

use anyhow::{Context, Result};
use cap_shipping::{CountryRegistry, TariffConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shipcalc", version, about = "Shipping rate calculator")]
struct Cli {
    /// Tariff document (YAML or JSON); overrides SHIPPING_TARIFF_PATH
    #[arg(long, global = true)]
    tariff: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a cart or a raw weight for a destination
    Quote(quote::QuoteArgs),
    /// List supported countries and their services
    Countries {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check whether a weight can ship to a country
    Validate {
        #[arg(long)]
        country: String,
        /// Total weight in grams
        #[arg(long)]
        weight: u32,
    },
    /// Tariff document operations
    Tariff {
        #[command(subcommand)]
        action: TariffAction,
    },
}

#[derive(Subcommand)]
enum TariffAction {
    /// Load and validate a tariff document
    Check {
        /// Tariff file (YAML or JSON)
        path: PathBuf,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "shipcalc=info,cap_shipping=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let tariff = cli.tariff.as_deref();
    match cli.command {
        Commands::Quote(args) => quote::quote(&load_registry(tariff)?, args),
        Commands::Countries { json } => quote::countries(&load_registry(tariff)?, json),
        Commands::Validate { country, weight } => {
            quote::validate(&load_registry(tariff)?, &country, weight)
        }
        Commands::Tariff { action } => match action {
            TariffAction::Check { path } => cmd_tariff_check(&path),
        },
    }
}

fn load_registry(flag: Option<&Path>) -> Result<CountryRegistry> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("SHIPPING_TARIFF_PATH").map(PathBuf::from));
    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading tariff");
            CountryRegistry::load(&p).with_context(|| format!("loading tariff {}", p.display()))
        }
        None => CountryRegistry::bundled().context("loading bundled tariff"),
    }
}

fn cmd_tariff_check(path: &Path) -> Result<()> {
    let cfg = TariffConfig::load(path).with_context(|| format!("checking {}", path.display()))?;
    println!(
        "ok: {} {} ({} countries)",
        cfg.carrier,
        cfg.version,
        cfg.countries.len()
    );
    for c in cfg.countries.values() {
        println!(
            "  {} {:<12} pickup={:<5} home={:<5} max={}g",
            c.code, c.name, c.pickup_point_available, c.home_delivery_available, c.max_weight
        );
    }
    Ok(())
}
