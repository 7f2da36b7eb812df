//! Persisting slice results to the output directory.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::error::{ProxyError, ProxyResult};

/// Directory the print pipeline picks G-code files up from.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to `root/filename`, creating the directory first.
    ///
    /// `filename` must already be a bare name (see `resolve_output_filename`).
    /// The body goes to a hidden `.part` file that is then renamed over the
    /// target, so readers see either the old file or the complete new one.
    /// Concurrent writes of the same name leave exactly one of them.
    pub async fn write(&self, filename: &str, contents: &[u8]) -> ProxyResult<PathBuf> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(ProxyError::OutputWrite)?;

        let path = self.root.join(filename);
        let staging = self.root.join(staging_name(filename));

        if let Err(e) = fs::write(&staging, contents).await {
            let _ = fs::remove_file(&staging).await;
            return Err(ProxyError::OutputWrite(e));
        }
        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(ProxyError::OutputWrite(e));
        }

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote slice output");
        Ok(path)
    }
}

/// Unique sibling name for an in-progress write, e.g. `.cube.gcode.3f9a….part`.
fn staging_name(filename: &str) -> String {
    format!(".{}.{}.part", filename, Uuid::new_v4().simple())
}
