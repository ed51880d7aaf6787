//! Kestrel CLI binary.
//!
//! Extract KPIs from filing documents, build standardized-facts
//! snapshots, run valuations and keep the filing store fresh.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use kestrel_data::{EdgarClient, FilingStore, UpdateManager};
use kestrel_extract::KpiExtractor;
use kestrel_facts::{CompanyFacts, FramePreference, parse_snapshot};
use kestrel_valuation::{ValuationConfig, ValuationScenario, valuation};
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(about = "KPI extraction and enterprise valuation for SEC filings", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the filing store database (defaults to the platform data
    /// directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract KPIs from a filing document
    Extract {
        /// Document to extract from (.txt, .html)
        file: PathBuf,

        /// Ticker whose mappings apply
        ticker: String,

        /// KPI mapping configuration (JSON)
        #[arg(long)]
        mappings: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Build a standardized-facts snapshot for a ticker
    Snapshot {
        /// Ticker to snapshot
        ticker: String,

        /// Read a companyfacts JSON file instead of fetching from EDGAR
        #[arg(long)]
        facts_file: Option<PathBuf>,

        /// Frame preference for flow metrics: any, qtd, ytd, fy
        #[arg(long, default_value = "any")]
        frame: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a valuation from a defaults configuration
    Value {
        /// Valuation configuration (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Interest-rate shift in basis points
        #[arg(long, default_value = "0")]
        rate_bps: i32,

        /// Throughput change in percent
        #[arg(long, default_value = "0.0")]
        throughput_pct: f64,

        /// EBITDA uplift as a decimal
        #[arg(long, default_value = "0.0")]
        ebitda_uplift: f64,
    },

    /// Add tickers to the tracked universe
    Track {
        /// Tickers to track
        tickers: Vec<String>,
    },

    /// Refresh stored filings
    Update {
        /// Tickers to refresh (defaults to the whole universe)
        tickers: Vec<String>,

        /// Refresh even if data is current
        #[arg(long)]
        force: bool,

        /// KPI mapping configuration for quality grading (JSON)
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Show store status
    Status,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("error: {error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let store_path = match &cli.db {
        Some(path) => path.clone(),
        None => default_store_path()?,
    };

    match cli.command {
        Commands::Extract {
            file,
            ticker,
            mappings,
            json,
        } => {
            let extractor = KpiExtractor::from_mapping_file(&mappings)?;
            let kpis = extractor.extract_from_file(&file, &ticker)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&kpis)?);
            } else if kpis.is_empty() {
                println!("no KPIs matched for {ticker}");
            } else {
                for (name, kpi) in &kpis {
                    println!("{:<20} {:>12.1} {}  [{}]", name, kpi.value, kpi.unit, kpi.citation);
                }
            }
        }

        Commands::Snapshot {
            ticker,
            facts_file,
            frame,
            json,
        } => {
            let facts = match facts_file {
                Some(path) => CompanyFacts::from_json_str(&std::fs::read_to_string(path)?)?,
                None => {
                    let client = EdgarClient::new()?;
                    let cik = client.get_company_cik(&ticker).await?;
                    client.get_company_facts(&cik).await?
                }
            };

            let preference = FramePreference::from_label(&frame);
            let (snapshot, provenance) = parse_snapshot(&facts, preference);

            if json {
                let payload = serde_json::json!({
                    "ticker": ticker,
                    "period_preference": preference.to_string(),
                    "metrics_millions": snapshot,
                    "facts_meta": provenance,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("snapshot for {ticker} (frames: {preference}, values in millions)");
                print_metric("ebitda (proxy)", snapshot.ebitda);
                print_metric("net debt", snapshot.net_debt);
                print_metric("net income", snapshot.net_income);
                print_metric("equity", snapshot.shareholder_equity);
                print_metric("interest expense", snapshot.interest_expense);
                print_metric("total assets", snapshot.total_assets);
                print_metric("total debt", snapshot.total_debt);
                print_metric("cash", snapshot.cash);
                print_metric("shares outstanding", snapshot.shares_outstanding);
            }
        }

        Commands::Value {
            config,
            rate_bps,
            throughput_pct,
            ebitda_uplift,
        } => {
            let config = ValuationConfig::from_file(&config)?;

            let report = config.validate();
            for warning in &report.warnings {
                eprintln!("warning: {warning}");
            }
            if !report.valid {
                for issue in &report.issues {
                    eprintln!("error: {issue}");
                }
                return Err("valuation configuration is inconsistent".into());
            }

            let scenario = ValuationScenario {
                rate_bps_change: rate_bps,
                throughput_pct_change: throughput_pct,
                ebitda_uplift,
            };
            let has_scenario = scenario != ValuationScenario::default();
            let results = valuation(&config.to_inputs(), has_scenario.then_some(&scenario));

            println!("WACC               {:>10.2}%", results.wacc * 100.0);
            println!("cost of equity     {:>10.2}%", results.cost_of_equity * 100.0);
            println!("EPV                {:>10.0}M", results.epv);
            println!("DCF value          {:>10.0}M", results.dcf_value);
            println!("EV / EBITDA        {:>10.1}x", results.ev_ebitda_ratio);
            println!("net debt / EBITDA  {:>10.1}x", results.net_debt_ebitda_ratio);
            if let Some(coverage) = results.interest_coverage {
                println!("interest coverage  {:>10.1}x", coverage);
            }
            if let (Some(epv), Some(dcf)) = (results.scenario_epv, results.scenario_dcf) {
                println!("scenario EPV       {:>10.0}M", epv);
                println!("scenario DCF       {:>10.0}M", dcf);
            }
        }

        Commands::Track { tickers } => {
            let store = FilingStore::new(&store_path)?;
            let client = EdgarClient::new()?;

            for ticker in tickers {
                let ticker = ticker.to_uppercase();
                let cik = client.get_company_cik(&ticker).await?;
                store.add_to_universe(&ticker, &cik, None)?;
                println!("tracking {ticker} (CIK {cik})");
            }
        }

        Commands::Update {
            tickers,
            force,
            mappings,
        } => {
            let store = FilingStore::new(&store_path)?;
            let extractor = match mappings {
                Some(path) => Some(KpiExtractor::from_mapping_file(&path)?),
                None => None,
            };
            let manager = UpdateManager::new(EdgarClient::new()?, store, extractor);

            let targets: Vec<String> = if tickers.is_empty() {
                manager
                    .store()
                    .universe()?
                    .into_iter()
                    .map(|(ticker, _)| ticker)
                    .collect()
            } else {
                tickers.iter().map(|t| t.to_uppercase()).collect()
            };

            if targets.is_empty() {
                println!("nothing to update; track tickers first");
                return Ok(());
            }

            let progress = ProgressBar::new(targets.len() as u64);
            progress.set_style(ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} {msg}",
            )?);

            let mut failures = 0usize;
            for ticker in &targets {
                progress.set_message(ticker.clone());
                let outcome = manager.update_ticker(ticker, force).await;
                if !outcome.success {
                    failures += 1;
                }
                progress.inc(1);
            }
            progress.finish_with_message("done");

            println!("updated {} tickers, {} failures", targets.len() - failures, failures);
        }

        Commands::Status => {
            let store = FilingStore::new(&store_path)?;
            let stats = store.stats()?;
            println!(
                "{} filings stored, {} tickers tracked",
                stats.filings, stats.universe_size
            );

            for (ticker, cik) in store.universe()? {
                match store.get_record(&ticker)? {
                    Some(record) => println!(
                        "{:<8} CIK {}  {} filed {}  quality {}  fetched {}",
                        ticker,
                        cik,
                        record.form,
                        record.filing_date,
                        record.quality.to_db_str(),
                        record.last_updated.format("%Y-%m-%d"),
                    ),
                    None => println!("{:<8} CIK {}  (no filing stored)", ticker, cik),
                }
            }
        }
    }

    Ok(())
}

fn print_metric(label: &str, value: Option<f64>) {
    match value {
        Some(value) => println!("{:<20} {:>12.1}", label, value),
        None => println!("{:<20} {:>12}", label, "-"),
    }
}

fn default_store_path() -> Result<PathBuf, Box<dyn Error>> {
    let base = dirs::data_dir().ok_or("could not determine a data directory; pass --db")?;
    let dir = base.join("kestrel");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("filings.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::parse_from([
            "kestrel", "extract", "filing.txt", "PPL", "--mappings", "mappings.json", "--json",
        ]);
        match cli.command {
            Commands::Extract { ticker, json, .. } => {
                assert_eq!(ticker, "PPL");
                assert!(json);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_snapshot_frame_default() {
        let cli = Cli::parse_from(["kestrel", "snapshot", "KMI"]);
        match cli.command {
            Commands::Snapshot { frame, .. } => assert_eq!(frame, "any"),
            _ => panic!("wrong subcommand"),
        }
    }
}
