//! Magic Tutor CLI - summarise articles and videos by URL
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use magic_tutor::{classify, format, server, Config, ContentRequest, Pipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "magic-tutor")]
#[command(author, version, about = "Summarise articles and videos by URL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (the default)
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(long)]
        bind: Option<String>,
    },
    /// Summarise a single URL and print the result
    Summarise {
        /// URL to summarise
        url: String,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
        /// Print the summary as HTML markup
        #[arg(long)]
        html: bool,
    },
    /// Print the content type detected for a URL
    Classify {
        /// URL to classify
        url: String,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = Config::load()?;
            let pipeline = Pipeline::from_config(&config)?;
            server::serve(pipeline, &config.server.bind).await?;
        }
        Some(Commands::Serve { bind }) => {
            let config = Config::load()?;
            let pipeline = Pipeline::from_config(&config)?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            server::serve(pipeline, &bind).await?;
        }
        Some(Commands::Summarise { url, raw, html }) => {
            let config = Config::load()?;
            let pipeline = Pipeline::from_config(&config)?;

            if raw {
                let content = pipeline.extract(&url).await?;
                println!("\n=== {} ({}) ===\n", url, content.source_type);
                if content.is_degraded() {
                    println!("[extraction failed]");
                }
                println!("{}", content.text);
                println!("\n--- Extracted {} characters ---", content.text.chars().count());
                return Ok(());
            }

            let result = pipeline.summarize(&ContentRequest { url }).await?;
            let lines = format::format_summary(&result.summary_text);

            if html {
                print!("{}", format::render_html(&lines));
            } else {
                println!("=== AI Summary - {} ===", result.content_type);
                println!("{}\n", result.source_url);
                print!("{}", format::render_terminal(&lines));
            }
        }
        Some(Commands::Classify { url }) => {
            println!("{}", classify(&url));
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "magic-tutor", &mut std::io::stdout());
        }
    }

    Ok(())
}
