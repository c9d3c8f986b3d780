use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use gst_core::import::{b2b_template, purchase_template};
use gst_core::tax::gstin;
use gst_core::tax::liability::{delayed_payment_interest, late_fee};
use gst_core::utils::init_tracing;
use gst_core::{compute_tax, BackendConfig, GstError, GstResult, GstReturns, GstType, HttpBackend, Month};

#[derive(Parser)]
#[command(name = "gstctl")]
#[command(version, about = "GST return preparation against the returns backend", long_about = None)]
struct Cli {
    /// Backend base URL (default: GST_API_URL or http://127.0.0.1:5001/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (default: GST_API_TIMEOUT_SECS or none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateKind {
    Purchase,
    B2b,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute CGST/SGST/IGST for a taxable value
    Tax {
        taxable_value: BigDecimal,

        /// GST rate in percent
        rate: BigDecimal,

        /// Charge IGST instead of CGST + SGST
        #[arg(long)]
        inter_state: bool,

        #[arg(long)]
        cess: Option<BigDecimal>,
    },

    /// Check a GSTIN and show its state
    Gstin { gstin: String },

    /// Print a CSV template header
    Template {
        #[arg(value_enum)]
        kind: TemplateKind,
    },

    /// Late filing fee for a number of days
    LateFee {
        days: u32,

        /// Use the composition scheme fee slabs
        #[arg(long)]
        composition: bool,
    },

    /// Interest on tax paid late
    Interest {
        amount: BigDecimal,
        days: u32,

        /// Annual rate in percent (default: 18)
        #[arg(long)]
        rate: Option<BigDecimal>,
    },

    /// Check that the backend is reachable
    Health,

    /// List registered clients
    Clients,

    /// Monthly report of a client
    Report {
        /// Client ID
        #[arg(short, long)]
        client: String,

        /// Return month, e.g. 2024-04
        #[arg(short, long)]
        month: Month,
    },

    /// ITC position of a client for a month
    Itc {
        #[arg(short, long)]
        client: String,

        #[arg(short, long)]
        month: Month,
    },

    /// Net GST of every client for a month
    Portfolio {
        #[arg(short, long)]
        month: Month,

        /// Print CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },

    /// Import a purchase register CSV
    ImportPurchases {
        #[arg(short, long)]
        client: String,

        /// CSV file in the purchase template layout
        file: PathBuf,

        /// Month for rows whose invoice date cannot be read
        #[arg(short, long)]
        month: Month,
    },

    /// Import a GSTR-1 B2B CSV
    ImportB2b {
        #[arg(short, long)]
        client: String,

        file: PathBuf,

        #[arg(short, long)]
        month: Month,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> GstResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn connect(cli: &Cli) -> GstResult<GstReturns<HttpBackend>> {
    let mut config = BackendConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.clone())?;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Some(Duration::from_secs(secs)));
    }
    Ok(GstReturns::new(HttpBackend::new(&config)?))
}

fn open(file: &PathBuf) -> GstResult<File> {
    File::open(file).map_err(|e| GstError::Validation(format!("Cannot open {}: {}", file.display(), e)))
}

async fn run() -> GstResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Tax {
            taxable_value,
            rate,
            inter_state,
            cess,
        } => print_json(&compute_tax(taxable_value, rate, *inter_state, cess.as_ref()).rounded()),
        Commands::Gstin { gstin: number } => {
            gstin::validate_gstin(number)?;
            let code = gstin::state_code(number).unwrap_or_default();
            println!(
                "{} is valid; state {} ({})",
                number,
                code,
                gstin::state_name(code).unwrap_or("unknown")
            );
            Ok(())
        }
        Commands::Template { kind } => {
            match kind {
                TemplateKind::Purchase => println!("{}", purchase_template()),
                TemplateKind::B2b => println!("{}", b2b_template()),
            }
            Ok(())
        }
        Commands::LateFee { days, composition } => {
            let gst_type = if *composition {
                GstType::Composition
            } else {
                GstType::Regular
            };
            print_json(&late_fee(*days, gst_type))
        }
        Commands::Interest { amount, days, rate } => {
            print_json(&delayed_payment_interest(amount, *days, rate.as_ref()))
        }
        Commands::Health => {
            connect(&cli)?.health().await?;
            println!("Backend is reachable");
            Ok(())
        }
        Commands::Clients => print_json(&connect(&cli)?.list_clients().await?),
        Commands::Report { client, month } => {
            let returns = connect(&cli)?;
            let client = returns.get_client_required(client).await?;
            print_json(&returns.monthly_report(&client, *month).await?)
        }
        Commands::Itc { client, month } => {
            let returns = connect(&cli)?;
            print_json(&returns.itc_state(client, *month).await?)
        }
        Commands::Portfolio { month, csv } => {
            let summary = connect(&cli)?.portfolio_summary(*month).await?;
            if *csv {
                summary.write_csv(std::io::stdout())
            } else {
                print_json(&summary)
            }
        }
        Commands::ImportPurchases {
            client,
            file,
            month,
        } => {
            let mut returns = connect(&cli)?;
            let summary = returns.import_purchases(client, open(file)?, *month).await?;
            println!("Saved {} purchases", summary.saved);
            for row in &summary.skipped {
                println!("  skipped line {}: {}", row.line, row.reason);
            }
            Ok(())
        }
        Commands::ImportB2b {
            client,
            file,
            month,
        } => {
            let mut returns = connect(&cli)?;
            let client = returns.get_client_required(client).await?;
            let summary = returns.import_b2b_sales(&client, open(file)?, *month).await?;
            println!("Saved {} B2B invoices", summary.saved);
            for row in &summary.skipped {
                println!("  skipped line {}: {}", row.line, row.reason);
            }
            Ok(())
        }
    }
}
