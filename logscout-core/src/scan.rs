use crate::error::{ScoutError, ScoutResult};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Line-at-a-time reader that tolerates non UTF-8 bytes.
pub(crate) struct LineScanner {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl LineScanner {
    pub(crate) async fn open(path: &Path) -> ScoutResult<Self> {
        let file = File::open(path)
            .await
            .map_err(|e| ScoutError::io(format!("could not open file {}", path.display()), e))?;

        Ok(Self {
            reader: BufReader::new(file),
            buf: Vec::with_capacity(512),
        })
    }

    /// Next line without its terminator, `None` at end of file.
    pub(crate) async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

pub(crate) fn unix_millis(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
