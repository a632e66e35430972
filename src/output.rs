use crate::{Result, ScanError};
use log::info;
use std::path::PathBuf;
use tokio::fs;

/// Replace dots so they do not read as a file extension
pub fn sanitize_hostname(hostname: &str) -> String {
    hostname.replace('.', "-")
}

/// `<hostname-with-dashes>_<tool>.txt`
pub fn file_name(hostname: &str, tool_name: &str) -> String {
    format!("{}_{}.txt", sanitize_hostname(hostname), tool_name)
}

/// Writes captured tool output, one file per (target, tool) pair, directly under
/// a single output directory.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, hostname: &str, tool_name: &str) -> PathBuf {
        self.dir.join(file_name(hostname, tool_name))
    }

    /// Create the directory if needed and replace any previous file for this pair.
    pub async fn write(
        &self,
        hostname: &str,
        tool_name: &str,
        contents: &[u8],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await.map_err(|source| ScanError::Persist {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(hostname, tool_name);
        fs::write(&path, contents).await.map_err(|source| ScanError::Persist {
            path: path.clone(),
            source,
        })?;

        info!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}
