//! Docscore CLI entrypoint.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use docscore::config::Config;
use docscore::identity::{ContextualSetting, SessionIdentity, normalize_url};
use docscore::pipeline::{QualityPipeline, ScoringResponse};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(
    name = "docscore",
    about = "Score a processed documentation page on five quality dimensions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score the processed content stored for a session and print the response JSON.
    Score {
        /// Session whose `processed-content.json` should be scored.
        session_id: String,
    },
    /// Print the canonical session identity for a URL.
    Derive {
        url: String,
        /// Derive for the with-context setting (related pages were included).
        #[arg(long, default_value_t = false)]
        with_context: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Score { session_id } => score(SessionIdentity::new(session_id)).await,
        Command::Derive { url, with_context } => {
            let setting = if with_context {
                ContextualSetting::WithContext
            } else {
                ContextualSetting::WithoutContext
            };
            println!("normalized: {}", normalize_url(&url));
            println!("setting:    {}", setting);
            println!("session:    {}", SessionIdentity::derive(&url, setting));
            Ok(())
        }
    }
}

async fn score(session: SessionIdentity) -> Result<()> {
    let response = match run(&session).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(session = %session, error = %e, "Scoring failed");
            ScoringResponse::failure(session, e.to_string())
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(session: &SessionIdentity) -> Result<ScoringResponse> {
    let config = Config::from_env()?;
    let pipeline = QualityPipeline::from_config(&config)?;
    Ok(pipeline.run(session).await?)
}
