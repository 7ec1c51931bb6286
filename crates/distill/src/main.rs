use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distill_common::{logger, AppConfig};
use distill_llm::{OpenAiClient, RecursiveSummarizer, SummarizerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    match find_project_root().map(|root| root.join(".env")) {
        Some(env_path) if env_path.exists() => {
            dotenv::from_path(&env_path).ok();
        }
        _ => {
            dotenv::dotenv().ok();
        }
    }
}

#[derive(Parser)]
#[command(name = "distill")]
#[command(about = "Distill - recursive long-document summarization over an LLM API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Summarize a document and print the result
    Summarize {
        /// Question the summary should focus on
        #[arg(long, short)]
        inquiry: String,

        /// Document to read; stdin when omitted
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Summarize { inquiry, file }) => {
            logger::setup_console_logging(&config.log_level)?;
            config.validate()?;

            let text = read_document(file).await?;
            let client = OpenAiClient::from_config(&config)?;
            let summarizer =
                RecursiveSummarizer::new(Arc::new(client), SummarizerConfig::from(&config))?;

            let report = summarizer.summarize_with_report(&text, &inquiry).await?;
            tracing::info!(
                "Done in {} rounds, {} completion calls",
                report.rounds,
                report.completion_calls
            );
            println!("{}", report.summary);
        }
        None => serve(config).await?,
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Distill starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Model: {}", config.llm_model);
    tracing::info!("  Completion API: {}", config.openai_base_url);

    distill_server::start_server(config).await?;
    Ok(())
}

async fn read_document(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read document from stdin")?;
            Ok(text)
        }
    }
}
