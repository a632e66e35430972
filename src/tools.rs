use crate::types::TargetDescriptor;
use log::debug;
use std::collections::HashMap;

pub const NMAP: &str = "nmap";
pub const SSLSCAN: &str = "sslscan";
pub const NIKTO: &str = "nikto";
pub const DIRB: &str = "dirb";

/// Tools run when the operator does not pick any
pub const DEFAULT_TOOLS: [&str; 4] = [NMAP, SSLSCAN, NIKTO, DIRB];

/// Builds a tool's argument vector (without the program name) from a target and optional proxy
pub type ArgBuilder = fn(&TargetDescriptor, Option<&str>) -> Vec<String>;

/// A registered tool. Stateless and shared by every target in a batch.
#[derive(Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Only meaningful against https targets
    pub requires_tls: bool,
    pub build_args: ArgBuilder,
}

static REGISTRY: [ToolSpec; 4] = [
    ToolSpec {
        name: NMAP,
        description: "network scanner, aggressive scan without host discovery",
        requires_tls: false,
        build_args: nmap_args,
    },
    ToolSpec {
        name: SSLSCAN,
        description: "TLS scanner against host:port",
        requires_tls: true,
        build_args: sslscan_args,
    },
    ToolSpec {
        name: NIKTO,
        description: "web vulnerability scanner",
        requires_tls: false,
        build_args: nikto_args,
    },
    ToolSpec {
        name: DIRB,
        description: "web content brute-forcer",
        requires_tls: false,
        build_args: dirb_args,
    },
];

fn nmap_args(target: &TargetDescriptor, _proxy: Option<&str>) -> Vec<String> {
    vec!["-Pn".to_string(), "-A".to_string(), target.hostname.clone()]
}

fn sslscan_args(target: &TargetDescriptor, _proxy: Option<&str>) -> Vec<String> {
    vec![target.netloc.clone()]
}

fn nikto_args(target: &TargetDescriptor, proxy: Option<&str>) -> Vec<String> {
    let mut args = vec!["-h".to_string(), target.base_url()];
    if target.is_https() {
        args.push("-ssl".to_string());
    }
    if let Some(proxy) = proxy {
        args.push("-useproxy".to_string());
        args.push(proxy.to_string());
    }
    args
}

fn dirb_args(target: &TargetDescriptor, proxy: Option<&str>) -> Vec<String> {
    let mut args = vec![target.full_url(), "-S".to_string(), "-w".to_string()];
    if let Some(proxy) = proxy {
        args.push("-p".to_string());
        args.push(proxy.to_string());
    }
    args
}

/// Requested tools sorted into what runs for one target and what was dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applicability {
    /// Tools to run, in request order
    pub tools: Vec<String>,
    /// TLS-only tools dropped because the target is plaintext
    pub tls_skipped: Vec<String>,
    /// Names with no registry entry
    pub unknown: Vec<String>,
}

/// Maps tool names to their invocation builders
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    binaries: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable for some tools; the arguments stay the same.
    pub fn with_binaries(binaries: HashMap<String, String>) -> Self {
        Self { binaries }
    }

    pub fn specs() -> &'static [ToolSpec] {
        &REGISTRY
    }

    pub fn get(name: &str) -> Option<&'static ToolSpec> {
        REGISTRY.iter().find(|spec| spec.name == name)
    }

    /// Filter the requested tools for one target. Duplicates collapse onto the
    /// first occurrence.
    pub fn applicable_tools(
        &self,
        requested: &[String],
        target: &TargetDescriptor,
    ) -> Applicability {
        let mut result = Applicability::default();

        for name in requested {
            let seen = result.tools.contains(name)
                || result.tls_skipped.contains(name)
                || result.unknown.contains(name);
            if seen {
                continue;
            }
            match Self::get(name) {
                Some(spec) if spec.requires_tls && !target.is_https() => {
                    debug!("{} dropped for plaintext target {}", name, target);
                    result.tls_skipped.push(name.clone());
                }
                Some(_) => result.tools.push(name.clone()),
                None => result.unknown.push(name.clone()),
            }
        }

        result
    }

    /// Full command line for a tool, program first. `None` for unknown tools.
    pub fn build(
        &self,
        name: &str,
        target: &TargetDescriptor,
        proxy: Option<&str>,
    ) -> Option<Vec<String>> {
        let spec = Self::get(name)?;
        let program = self
            .binaries
            .get(name)
            .cloned()
            .unwrap_or_else(|| spec.name.to_string());

        let mut argv = vec![program];
        argv.extend((spec.build_args)(target, proxy));
        Some(argv)
    }
}
