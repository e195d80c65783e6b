use std::fmt;
use std::str::FromStr;

/// Operations served under the API prefix; peers expose the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Search,
    Tail,
    TailLog,
    ListLogs,
    DownloadLog,
    Stats,
    Errors,
    CollectStats,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::Search => "search",
            Endpoint::Tail => "tail",
            Endpoint::TailLog => "tail-log",
            Endpoint::ListLogs => "list-logs",
            Endpoint::DownloadLog => "download-log",
            Endpoint::Stats => "stats",
            Endpoint::Errors => "errors",
            Endpoint::CollectStats => "collect-stats",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" => Ok(Endpoint::Health),
            "search" => Ok(Endpoint::Search),
            "tail" => Ok(Endpoint::Tail),
            "tail-log" => Ok(Endpoint::TailLog),
            "list-logs" => Ok(Endpoint::ListLogs),
            "download-log" => Ok(Endpoint::DownloadLog),
            "stats" => Ok(Endpoint::Stats),
            "errors" => Ok(Endpoint::Errors),
            "collect-stats" => Ok(Endpoint::CollectStats),
            _ => Err("unknown endpoint"),
        }
    }
}
