use crate::{Result, ScanError};
use log::info;
use std::collections::VecDeque;
use std::path::Path;
use tokio::fs;

/// Raw target strings for one batch, consumed front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunQueue {
    entries: VecDeque<String>,
}

impl RunQueue {
    pub fn single(target: &str) -> Self {
        Self::from_entries([target])
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// One target per line. Blank lines and `#` comments are ignored.
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ScanError::TargetFileMissing(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).await?;
        let queue = Self::from_entries(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );

        info!("Loaded {} targets from {}", queue.len(), path.display());
        Ok(queue)
    }

    /// Build the queue from the command line. A target file wins over a single target.
    pub async fn from_sources(target: Option<&str>, targets_file: Option<&Path>) -> Result<Self> {
        match (targets_file, target) {
            (Some(path), _) => Self::from_file(path).await,
            (None, Some(target)) => Ok(Self::single(target)),
            (None, None) => Err(ScanError::NoTarget),
        }
    }

    pub fn pop_front(&mut self) -> Option<String> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
