use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary log directory; removed on drop.
pub struct LogFixture {
    dir: TempDir,
}

impl Default for LogFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `lines` (newline-terminated) and returns the absolute path as a string.
    pub fn write(&self, name: &str, lines: &[&str]) -> String {
        let path = self.path(name);
        let mut body = lines.join("\n");
        body.push('\n');
        std::fs::write(&path, body).expect("failed to write fixture log");
        path.to_string_lossy().into_owned()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
