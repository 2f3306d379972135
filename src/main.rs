use clap::{Parser, Subcommand};
use tracing::warn;

use breach_scraper::apis::iib::IibSource;
use breach_scraper::apis::pwned::PwnedSource;
use breach_scraper::config::Config;
use breach_scraper::constants;
use breach_scraper::logging;
use breach_scraper::pipeline::{self, clean::DatasetCleaner};
use breach_scraper::report;
use breach_scraper::types::BreachSource;

#[derive(Parser)]
#[command(name = "breach_scraper")]
#[command(about = "Breach-disclosure data ingestion and summary pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and clean the configured sources
    Ingest {
        /// Specific sources to run (comma-separated). Available: pwned, iib
        #[arg(long)]
        sources: Option<String>,
    },
    /// Fetch, clean and aggregate into summary files
    Report {
        /// Specific sources to run (comma-separated)
        #[arg(long)]
        sources: Option<String>,
    },
    /// Run ingest and report sequentially
    Run {
        /// Specific sources to run (comma-separated)
        #[arg(long)]
        sources: Option<String>,
    },
}

fn create_source(source_id: &str, config: &Config) -> Option<Box<dyn BreachSource>> {
    match source_id {
        constants::PWNED_SOURCE => Some(Box::new(PwnedSource::new(&config.sources.pwned))),
        constants::IIB_SOURCE => Some(Box::new(IibSource::new(&config.sources.iib))),
        _ => None,
    }
}

fn parse_source_list(sources: Option<String>) -> Vec<String> {
    match sources {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => constants::supported_sources()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

async fn run_sources(
    source_ids: &[String],
    config: &Config,
    show_examples: bool,
    summarize: bool,
) -> anyhow::Result<()> {
    let cleaner = DatasetCleaner::new(config.validation.clone());

    for source_id in source_ids {
        let span = tracing::info_span!("Running source", source = %source_id);
        let _enter = span.enter();

        let Some(source) = create_source(source_id, config) else {
            warn!("Unknown source specified");
            println!("⚠️  Unknown source: {}", source_id);
            continue;
        };

        println!("📡 Fetching {}...", source_id);
        let t_run = std::time::Instant::now();
        let outcome = pipeline::run_for_source(source.as_ref(), &cleaner).await?;
        pipeline::push_run_metrics(&outcome, t_run.elapsed().as_secs_f64()).await;

        println!("\n📊 Pipeline results for {}:", source_id);
        println!("   Breaches returned: {}", outcome.fetched_records);
        println!("   Breaches usable:   {}", outcome.usable_records);
        println!("   Rejected:          {}", outcome.rejected_records());

        if show_examples {
            if let Some(example) = outcome.example_record() {
                println!("   Example record:");
                println!("{}", serde_json::to_string_pretty(example)?);
            }
        }

        if summarize {
            let summary = report::summarize(source_id, &outcome.records);
            report::print_summary(&summary);
            let path = report::write_summary(&summary, &config.output.dir)?;
            println!("💾 Summary written to {}", path);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Ingest { sources } => {
            println!("🔄 Running ingest pipeline...");
            run_sources(&parse_source_list(sources), &config, true, false).await?;
        }
        Commands::Report { sources } => {
            println!("📈 Running report pipeline...");
            run_sources(&parse_source_list(sources), &config, false, true).await?;
        }
        Commands::Run { sources } => {
            println!("🚀 Running full pipeline (ingest + report)...");
            run_sources(&parse_source_list(sources), &config, true, true).await?;
        }
    }
    Ok(())
}
