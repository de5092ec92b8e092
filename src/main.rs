use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use streaming_originals::apis::{HttpPageFetcher, PageFetcher, SnapshotPageFetcher};
use streaming_originals::config::Config;
use streaming_originals::constants;
use streaming_originals::logging;
use streaming_originals::pipeline::{write_report, Pipeline};

#[derive(Parser)]
#[command(name = "streaming_originals")]
#[command(about = "Builds a dataset of streaming services' original TV programming from Wikipedia listings")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, clean and write the dataset
    Run {
        /// Source configuration file (TOML); built-in sources when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Specific sources to run (comma-separated). Default: all configured sources
        #[arg(long)]
        sources: Option<String>,
        /// Read pages from a snapshot directory instead of the network
        #[arg(long)]
        html_dir: Option<PathBuf>,
        /// Output CSV file
        #[arg(long, default_value = constants::DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
        /// Also write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Save the listing pages for offline runs
    Fetch {
        /// Directory receiving one `<source-id>.html` per source
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        sources: Option<String>,
    },
    /// List configured sources
    Sources {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_source_list(sources: Option<String>) -> Option<Vec<String>> {
    sources.map(|list| {
        list.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn create_fetcher(config: &Config, html_dir: Option<PathBuf>) -> anyhow::Result<Arc<dyn PageFetcher>> {
    let fetcher: Arc<dyn PageFetcher> = match html_dir {
        Some(dir) => Arc::new(SnapshotPageFetcher::new(dir)),
        None => Arc::new(HttpPageFetcher::new(&config.fetch)?),
    };
    Ok(fetcher)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            sources,
            html_dir,
            output,
            report,
        } => {
            println!("🔄 Building streaming originals dataset...");
            let config = Config::load_or_builtin(config.as_deref())?;
            let fetcher = create_fetcher(&config, html_dir)?;
            let ids = parse_source_list(sources);
            let pipeline = Pipeline::new(config, fetcher);

            match pipeline.run(ids.as_deref(), &output).await {
                Ok(result) => {
                    info!("Pipeline finished");
                    println!("\n📊 Pipeline Results:");
                    for source in &result.sources {
                        println!(
                            "   {} ({}): {} genres, {} records",
                            source.service, source.id, source.tables_used, source.records
                        );
                    }
                    println!("   Merged: {}", result.merged);
                    println!("   Dropped: {}", result.dropped);
                    println!("   Cleaned: {}", result.cleaned);
                    if let Some(file) = &result.output_file {
                        println!("   Output file: {}", file);
                    }
                    if let Some(path) = report {
                        write_report(&result, &path)?;
                        println!("   Report: {}", path.display());
                    }
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Fetch {
            dir,
            config,
            sources,
        } => {
            println!("📡 Saving listing pages to {}...", dir.display());
            let config = Config::load_or_builtin(config.as_deref())?;
            let fetcher = create_fetcher(&config, None)?;
            let ids = parse_source_list(sources);
            let pipeline = Pipeline::new(config, fetcher);

            let paths = pipeline.snapshot(ids.as_deref(), &dir).await?;
            for path in &paths {
                println!("   {}", path.display());
            }
            println!("✅ Saved {} pages", paths.len());
        }
        Commands::Sources { config } => {
            let config = Config::load_or_builtin(config.as_deref())?;
            println!("📋 Configured sources:");
            for source in &config.sources {
                println!(
                    "   {:<14} {:<13} mapper={:<13} end={:?}",
                    source.id, source.service, source.mapper, source.end_heading
                );
                println!("   {:<14} {}", "", source.url);
            }
        }
    }

    Ok(())
}
