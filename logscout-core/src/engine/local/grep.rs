use crate::engine::LocalEngine;
use crate::error::ScoutError;
use crate::scan::LineScanner;
use crate::tokenize::strip_ansi;
use std::path::Path;

/// Matching lines plus the error that stopped the scan, if any.
///
/// Lines collected before a mid-file read error are kept.
#[derive(Debug, Default)]
pub struct GrepOutcome {
    pub lines: Vec<String>,
    pub error: Option<ScoutError>,
}

impl LocalEngine {
    /// Case-insensitive substring match, lines returned in file order.
    pub async fn grep_file(&self, path: &Path, needle: &str) -> GrepOutcome {
        let mut scanner = match LineScanner::open(path).await {
            Ok(s) => s,
            Err(e) => {
                return GrepOutcome {
                    lines: Vec::new(),
                    error: Some(e),
                };
            }
        };

        let needle = needle.to_lowercase();
        let mut lines = Vec::with_capacity(20);

        loop {
            match scanner.next_line().await {
                Ok(Some(line)) => {
                    if line.to_lowercase().contains(&needle) {
                        lines.push(strip_ansi(&line).into_owned());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    return GrepOutcome {
                        lines,
                        error: Some(ScoutError::io(
                            format!("error when grepping file {}", path.display()),
                            e,
                        )),
                    };
                }
            }
        }

        GrepOutcome { lines, error: None }
    }
}
