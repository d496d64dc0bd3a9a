use clap::{Parser, Subcommand};
use larisin::{config, schedule, server};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "larisin")]
#[command(about = "Marketing asset generator for small shops")]
#[command(long_about = "\
Marketing asset generator for small shops

Describe a product and the shop selling it; larisin writes social captions
for each platform, renders a poster at several aspect ratios, drafts a
posting plan, and bundles everything into a zip.

Files are written to <public-dir>/outputs/ and served back over HTTP:

  public/
  ├── index.html                           # Your front end (served at /)
  └── outputs/
      ├── poster-<uuid>-1x1.png            # POST /api/generate/poster
      ├── poster-<uuid>-9x16.png
      └── larisin-<uuid>.zip               # POST /api/export/zip

Configuration (later wins):
  stock defaults → larisin.toml → environment → command-line flags

Without LLM_API_KEY captions are offline placeholders starting with \"MOCK:\".
Posters need Chrome or Chromium; set CHROME_EXECUTABLE_PATH if it is not
found automatically.

Run 'larisin gen-config' to generate a documented larisin.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing larisin.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Directory served at / (overrides paths.public_dir)
        #[arg(long)]
        public_dir: Option<PathBuf>,
        /// Listen port (overrides server.port and PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a stock larisin.toml with all options documented
    GenConfig,
    /// Print a posting plan starting today, without starting the server
    Plan {
        /// Product name used in each caption line
        #[arg(long)]
        product: Option<String>,
        /// Number of days
        #[arg(long, default_value_t = schedule::DEFAULT_DAYS)]
        days: i64,
        /// Caption style
        #[arg(long, default_value = larisin::prompt::DEFAULT_TONE)]
        tone: String,
        /// Target platform (repeatable)
        #[arg(long = "platform")]
        platforms: Vec<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { public_dir, port } => {
            init_tracing();

            let mut app_config = config::load_config(&cli.config_dir, |key| std::env::var(key).ok())?;
            if let Some(dir) = public_dir {
                app_config.paths.public_dir = dir;
            }
            if let Some(port) = port {
                app_config.server.port = port;
            }
            tracing::info!("Configuration loaded");

            let state = server::AppState::from_config(app_config)?;
            server::serve(state).await?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Plan {
            product,
            days,
            tone,
            platforms,
            json,
        } => {
            let product = larisin::types::Product {
                name: product,
                ..Default::default()
            };
            let platforms = if platforms.is_empty() {
                larisin::caption::default_platforms()
            } else {
                platforms
            };
            let today = chrono::Local::now().date_naive();
            let items = schedule::plan(&product, &platforms, days, &tone, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in &items {
                    println!("{:<16} {}", item.date, item.idea);
                    println!("{:<16} {}", "", item.caption);
                }
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so `plan --json` output stays pipeable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,larisin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
