mod commands;
mod opts;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::process::ProcessArgs;
use commands::show::ShowArgs;
use opts::StoreOpts;

#[derive(Parser, Debug)]
#[command(name = "ethtrace", version, about = "Read and process block execution traces")]
struct Cli {
    #[command(flatten)]
    opts: StoreOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized traces of a block as JSON
    Show(ShowArgs),

    /// Drive the logging handler over every trace of a block
    Process(ProcessArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    setup_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Show(args) => commands::show::cmd_show(&cli.opts, &args).await,
        Command::Process(args) => commands::process::cmd_process(&cli.opts, &args).await,
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
