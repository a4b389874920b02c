use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{CardError, CardResult};

/// Destination for exported files: the "save as download" side of an export.
pub trait FileSink: Send {
    /// Persist one named file. Called exactly once per successful export.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> CardResult<()>;
}

/// Writes files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl FileSink for DirSink {
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn save(&mut self, filename: &str, bytes: &[u8]) -> CardResult<()> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
            return Err(CardError::validation(format!(
                "refusing to save '{filename}': not a plain file name"
            )));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "saved");
        self.saved.push(path);
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured `(filename, bytes)` pairs in save order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }
}

impl FileSink for InMemorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> CardResult<()> {
        self.files.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
