mod rates;
mod update;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "borderfuel")]
#[command(about = "Scrape regional fuel prices into the border data store")]
struct Cli {
    /// Sources file (countries, currencies, fuel labels). Overrides `BORDERFUEL_SOURCES_PATH`.
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch prices and merge them into the store (the default).
    Update(UpdateArgs),
    /// Show the exchange-rate table the next update would use.
    Rates,
}

#[derive(Debug, Default, Args)]
struct UpdateArgs {
    /// Store document to update. Overrides `BORDERFUEL_STORE_PATH`.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Restrict the run to these country codes (repeatable).
    #[arg(long = "country", value_name = "CODE")]
    countries: Vec<String>,

    /// Fetch and extract, but do not write the store.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let mut config = borderfuel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(sources) = cli.sources {
        config.sources_path = sources;
    }

    match cli.command.unwrap_or(Commands::Update(UpdateArgs::default())) {
        Commands::Update(args) => {
            if let Some(store) = args.store {
                config.store_path = store;
            }
            let options = update::UpdateOptions {
                countries: args.countries,
                dry_run: args.dry_run,
            };
            let summary = update::run_update(&config, &options).await?;
            summary.print(options.dry_run);
        }
        Commands::Rates => rates::run_rates(&config).await?,
    }

    Ok(())
}
