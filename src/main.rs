use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use adaptlearn::config::{load_settings, Settings};
use adaptlearn::server::{self, templates};
use adaptlearn::{AppState, ProcessingStatus, Tab};

#[derive(Parser)]
#[command(name = "adaptlearn", version, about = "Adaptive learning platform page mock-up")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the page locally
    Serve {
        #[arg(long, env = "ADAPTLEARN_HOST")]
        host: Option<String>,
        #[arg(long, short, env = "ADAPTLEARN_PORT")]
        port: Option<u16>,
        /// Simulated file processing delay
        #[arg(long, env = "ADAPTLEARN_UPLOAD_DELAY_MS")]
        upload_delay_ms: Option<u64>,
        /// Simulated quiz generation delay
        #[arg(long, env = "ADAPTLEARN_QUIZ_DELAY_MS")]
        quiz_delay_ms: Option<u64>,
        /// Cancel pending processing when a new one starts
        #[arg(long)]
        coalesce: bool,
    },
    /// Write a static snapshot of the page
    Render {
        #[arg(long, default_value = "upload")]
        tab: String,
        /// Uploaded file name (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
        #[arg(long, default_value = "idle")]
        status: String,
        /// File row to highlight
        #[arg(long)]
        selected: Option<String>,
        /// Output path (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("adaptlearn=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            upload_delay_ms,
            quiz_delay_ms,
            coalesce,
        } => {
            let mut settings = load_settings().await;
            apply_overrides(&mut settings, host, port, upload_delay_ms, quiz_delay_ms, coalesce);
            server::serve(&settings).await
        }
        Command::Render {
            tab,
            files,
            status,
            selected,
            output,
        } => {
            let state = AppState {
                current_tab: tab.parse::<Tab>()?,
                processing_status: status.parse::<ProcessingStatus>()?,
                selected_file: selected.filter(|name| files.contains(name)),
                uploaded_files: files,
                revision: 0,
            };
            let html = templates::static_page(&state);

            match output {
                Some(path) => {
                    fs::write(&path, html)?;
                    info!("Wrote {} tab snapshot to {}", state.current_tab, path.display());
                }
                None => println!("{}", html),
            }
            Ok(())
        }
    }
}

fn apply_overrides(
    settings: &mut Settings,
    host: Option<String>,
    port: Option<u16>,
    upload_delay_ms: Option<u64>,
    quiz_delay_ms: Option<u64>,
    coalesce: bool,
) {
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    if let Some(delay) = upload_delay_ms {
        settings.upload_delay_ms = delay;
    }
    if let Some(delay) = quiz_delay_ms {
        settings.quiz_delay_ms = delay;
    }
    if coalesce {
        settings.coalesce_tasks = true;
    }
}
