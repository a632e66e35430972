use crate::queue::RunQueue;
use crate::tools::DEFAULT_TOOLS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Tools to run, in order
    #[serde(default = "default_tools")]
    pub tools: Vec<String>,
    /// Passed to proxy-aware tools only (nikto, dirb)
    #[serde(default)]
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Persist output here as well as streaming it
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Executable override per tool name, e.g. `nikto = "/opt/nikto/program/nikto.pl"`
    #[serde(default)]
    pub binaries: HashMap<String, String>,
}

fn default_tools() -> Vec<String> {
    DEFAULT_TOOLS.iter().map(|tool| tool.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tools: default_tools(),
            proxy: None,
        }
    }
}

/// Everything the dispatcher needs for one batch, passed in explicitly.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub queue: RunQueue,
    pub requested_tools: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub proxy: Option<String>,
    pub binaries: HashMap<String, String>,
}

impl Config {
    pub fn load_from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| crate::ScanError::ConfigSerialize(e.to_string()))?;

        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(
        &mut self,
        tools: Option<Vec<String>>,
        output_dir: Option<PathBuf>,
        proxy: Option<String>,
    ) {
        if let Some(tools) = tools {
            self.scan.tools = tools;
        }
        if let Some(dir) = output_dir {
            self.output.dir = Some(dir);
        }
        if let Some(proxy) = proxy {
            self.scan.proxy = Some(proxy);
        }
    }

    pub fn into_run_config(self, queue: RunQueue) -> RunConfig {
        RunConfig {
            queue,
            requested_tools: self.scan.tools,
            output_dir: self.output.dir,
            proxy: self.scan.proxy,
            binaries: self.tools.binaries,
        }
    }
}
