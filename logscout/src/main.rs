use anyhow::Result;
use clap::{Parser, Subcommand};
use logscout_core::cli::{QueryCmd, run_query};
use logscout_core::conf::{ScoutConfig, load_config};
use logscout_core::logging::{OutputMode, default_output_mode, init_logging};
use logscout_core::server;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "logscout",
    version,
    about = "logscout: search, tail and summarize logs across a fleet"
)]
struct Cli {
    /// Path to the logscout config file
    #[arg(long, global = true, default_value = "config/logscout.toml")]
    config: String,

    /// Pretty-print JSON answers
    #[arg(long, global = true)]
    pretty: bool,

    /// Compact JSON answers, one per line
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the logscout API server (default)
    Run,

    #[command(flatten)]
    Query(QueryCmd),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(Path::new(&cli.config))?;

    match cli.command {
        Some(Command::Query(cmd)) => {
            let mode = if cli.raw {
                OutputMode::Raw
            } else if cli.pretty {
                OutputMode::Pretty
            } else {
                default_output_mode()
            };

            // stdout carries the answer; diagnostics only go to a configured file.
            let _guard = cfg
                .logging
                .file
                .clone()
                .and_then(|file| init_logging(Some(&file)));

            run_query(cfg, cmd, mode)
        }

        Some(Command::Run) | None => serve(cfg),
    }
}

fn serve(cfg: ScoutConfig) -> Result<()> {
    let _guard = init_logging(cfg.logging.file.as_deref());
    tracing::info!(listen = %cfg.server.listen, "starting logscout");
    server::run(cfg)
}
