//! webdisco - web target reconnaissance driver
//!
//! Runs a fixed set of external reconnaissance tools (nmap, sslscan, nikto,
//! dirb) against one or more web targets, one tool at a time, streaming each
//! tool's output live and optionally persisting it per target and tool.
//!
//! # Warning
//! This tool is designed for ethical penetration testing and security assessment
//! purposes only. Users are responsible for ensuring they have proper authorization
//! before scanning any networks or systems.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod error;
pub mod interrupt;
pub mod output;
pub mod queue;
pub mod runner;
pub mod target;
pub mod tools;
pub mod utils;

pub use error::{Result, ScanError};

/// Common types shared by the resolver, registry, runner and dispatcher
pub mod types {
    use std::fmt;

    /// A parsed web target. Built once per raw target string and never mutated.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TargetDescriptor {
        /// `http` or `https`
        pub scheme: String,
        /// Host without brackets or port, lower-cased for domain names
        pub hostname: String,
        /// Explicit, non-default port
        pub port: Option<u16>,
        /// `host[:port]` exactly as it goes on a command line
        pub netloc: String,
        /// Request path, `None` when empty or `/`
        pub path: Option<String>,
    }

    impl TargetDescriptor {
        pub fn is_https(&self) -> bool {
            self.scheme == "https"
        }

        /// `scheme://netloc`
        pub fn base_url(&self) -> String {
            format!("{}://{}", self.scheme, self.netloc)
        }

        /// `scheme://netloc/path`, or the base URL when there is no path
        pub fn full_url(&self) -> String {
            match &self.path {
                Some(path) => format!("{}{}", self.base_url(), path),
                None => self.base_url(),
            }
        }
    }

    impl fmt::Display for TargetDescriptor {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.full_url())
        }
    }

    /// Result of one tool invocation, handed to persistence and then dropped.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ExecutionResult {
        pub tool_name: String,
        /// True whenever the process launched and exited, whatever its exit code
        pub exit_succeeded: bool,
        pub exit_code: Option<i32>,
        /// Raw standard output, byte for byte as it was streamed
        pub captured_output: Option<Vec<u8>>,
    }

    impl ExecutionResult {
        /// A tool that could not be launched at all
        pub fn failed(tool_name: &str) -> Self {
            Self {
                tool_name: tool_name.to_string(),
                exit_succeeded: false,
                exit_code: None,
                captured_output: None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RunOutcome {
        Finished(ExecutionResult),
        /// The operator interrupted the tool and the child was killed
        Interrupted,
    }

    /// Operator's answer after an interruption
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Decision {
        Continue,
        Abort,
    }
}
