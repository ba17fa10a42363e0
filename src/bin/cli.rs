//! offercast CLI
//!
//! Single-run entry point; an external scheduler (cron or a systemd
//! timer with overlap prevention) triggers it hourly during the day.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use offercast::{
    config::{self, Secrets},
    error::Result,
    models::Config,
    pipeline,
    storage::topics,
};

/// offercast - listing feed publisher
#[derive(Parser, Debug)]
#[command(
    name = "offercast",
    version,
    about = "Publishes new real-estate feed listings to Telegram"
)]
struct Cli {
    /// Path to storage directory containing config and state files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute one fetch-diff-publish run
    Run,

    /// Validate configuration files
    Validate,

    /// Convert a semicolon-delimited topic table to the JSON form
    Convert {
        /// Path to the name;ukr_name;topic_id text table
        input: PathBuf,

        /// Output path (default: {storage_dir}/{publisher.topics_file})
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Duplicates log output to stdout and the append-mode run log.
struct Tee {
    file: std::fs::File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Initialize logging based on verbosity, teeing to {storage_dir}/app.log.
fn init_logging(verbose: bool, storage_dir: &PathBuf) {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    let log_path = storage_dir.join("app.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
        }
        Err(e) => {
            eprintln!("Cannot open {}: {e}; logging to stderr only", log_path.display());
        }
    }

    builder.init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = std::fs::create_dir_all(&cli.storage_dir) {
        eprintln!("Cannot create {}: {e}", cli.storage_dir.display());
    }
    init_logging(cli.verbose, &cli.storage_dir);

    log::info!("offercast starting...");

    match cli.command {
        Command::Run => {
            let config = config::load(&cli.storage_dir)?;
            let secrets = Secrets::from_env()?;
            pipeline::run(&config, &secrets, &cli.storage_dir).await?;
        }

        Command::Validate => {
            let config = Config::load_or_default(cli.storage_dir.join("config.toml"));
            config.validate()?;
            log::info!("✓ Config OK (feed, checkpoint, publisher, contacts)");

            if config.publisher.routing == offercast::models::RoutingMode::Topics {
                let table =
                    topics::load(&cli.storage_dir.join(&config.publisher.topics_file)).await?;
                log::info!("✓ Topic table OK ({} entries)", table.len());
            }

            if Secrets::from_env().is_ok() {
                log::info!("✓ BOT_TOKEN and TARGET_CHAT_ID present");
            } else {
                log::warn!("BOT_TOKEN / TARGET_CHAT_ID not set; `run` will fail");
            }

            log::info!("All validations passed!");
        }

        Command::Convert { input, output } => {
            let config = Config::load_or_default(cli.storage_dir.join("config.toml"));
            let text = std::fs::read_to_string(&input)?;
            let table = topics::from_csv(&text)?;

            let output =
                output.unwrap_or_else(|| cli.storage_dir.join(&config.publisher.topics_file));
            topics::write(&output, &table).await?;

            log::info!("Wrote {} topic entries to {}", table.len(), output.display());
        }
    }

    log::info!("Done!");

    Ok(())
}
