use crate::conf::ScoutConfig;
use crate::ctx::ScoutContext;
use crate::engine::RequestScope;
use crate::logging::OutputMode;
use crate::model::{
    CollectStatsRequest, ErrorsRequest, ListLogsRequest, LogColumnMap, SearchRequest,
    StatsRequest, TailOutcome, TailRequest,
};
use crate::search::Orchestrator;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use std::io::Write;

/// One-shot queries, answered through the same orchestrator the server uses.
#[derive(Subcommand, Debug, Clone)]
pub enum QueryCmd {
    /// Case-insensitive search across logs and hosts
    Grep {
        value: String,

        #[arg(long = "log", required = true)]
        logs: Vec<String>,

        #[arg(long = "host", default_value = "localhost")]
        hosts: Vec<String>,
    },

    /// Last lines of a log, if it changed since `--since` (Unix ms)
    Tail {
        log: String,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(long, default_value_t = 0)]
        since: i64,
    },

    /// List files next to the given logs, newest first
    List {
        #[arg(required = true)]
        logs: Vec<String>,

        #[arg(long = "host", default_value = "localhost")]
        hosts: Vec<String>,
    },

    /// Per-user counters
    Stats {
        log: String,

        /// e.g. date=0,user=1,reqid=2,level=3,message=5
        #[arg(long)]
        columns: LogColumnMap,

        #[arg(long, default_value = "localhost")]
        host: String,
    },

    /// Paginated errors and warnings, most recent first
    Errors {
        log: String,

        #[arg(long)]
        columns: LogColumnMap,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(long, default_value_t = 0)]
        from: usize,

        #[arg(long, default_value_t = 20)]
        size: usize,
    },

    /// Per-user level counts for one day across rotated files
    CollectStats {
        log: String,

        #[arg(long)]
        columns: LogColumnMap,

        #[arg(long)]
        date: String,
    },
}

pub fn run_query(config: ScoutConfig, cmd: QueryCmd, mode: OutputMode) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build query runtime")?;

    let ctx = ScoutContext::new(config)?;
    let orch = Orchestrator::new(&ctx);
    let stdout = std::io::stdout();

    rt.block_on(execute(&orch, cmd, mode, &mut stdout.lock()))
}

pub(crate) async fn execute<W: Write>(
    orch: &Orchestrator,
    cmd: QueryCmd,
    mode: OutputMode,
    out: &mut W,
) -> Result<()> {
    let scope = RequestScope::default();

    match cmd {
        QueryCmd::Grep { value, logs, hosts } => {
            let req = SearchRequest {
                value,
                logs,
                hosts,
                ..SearchRequest::default()
            };
            print(out, mode, &orch.search(&scope, &req).await?)
        }
        QueryCmd::Tail { log, host, since } => {
            let req = TailRequest {
                host,
                log,
                log_structure: None,
                modtime: since,
            };
            match orch.tail(&scope, &req).await? {
                TailOutcome::Modified(res) => print(out, mode, &res),
                TailOutcome::NotModified => {
                    eprintln!("not modified since {since}");
                    Ok(())
                }
            }
        }
        QueryCmd::List { logs, hosts } => {
            let req = ListLogsRequest { logs, hosts };
            print(out, mode, &orch.list(&scope, &req).await?)
        }
        QueryCmd::Stats { log, columns, host } => {
            let req = StatsRequest {
                host,
                log,
                log_structure: Some(columns),
            };
            print(out, mode, &orch.stats(&scope, &req).await?)
        }
        QueryCmd::Errors {
            log,
            columns,
            host,
            from,
            size,
        } => {
            let req = ErrorsRequest {
                host,
                log,
                log_structure: Some(columns),
                from,
                size,
            };
            print(out, mode, &orch.errors(&scope, &req).await?)
        }
        QueryCmd::CollectStats { log, columns, date } => {
            let req = CollectStatsRequest {
                log_path: log,
                log_structure: Some(columns),
                date,
            };
            print(out, mode, &orch.collect_stats(&scope, &req).await?)
        }
    }
}

fn print<W: Write, T: Serialize>(out: &mut W, mode: OutputMode, value: &T) -> Result<()> {
    let text = match mode {
        OutputMode::Pretty => serde_json::to_string_pretty(value)?,
        OutputMode::Raw => serde_json::to_string(value)?,
    };
    writeln!(out, "{text}")?;
    Ok(())
}
