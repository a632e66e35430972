use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webdisco")]
#[command(about = "Run basic info gathering apps against a web target")]
#[command(long_about = r#"
webdisco runs nmap, sslscan, nikto and dirb against one or more web targets,
one tool at a time, showing each tool's output as it arrives.

WARNING: This tool should only be used on networks and systems you own or
have explicit permission to test. Unauthorized scanning may be illegal.

Usage Examples:
  webdisco -t https://www.example.com                 # All default tools
  webdisco -t http://www.example.com -r nikto dirb    # Pick the tools
  webdisco -T targets.txt -o results                  # Batch, keep output
  webdisco -t https://www.example.com -x http://127.0.0.1:8080

Press Ctrl-C while a tool runs to kill it; you will be asked whether to
continue with the remaining tools and targets or abort.
"#)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// A target URL, e.g. https://www.example.com
    #[arg(short = 't', long = "target", value_name = "URL", conflicts_with = "targets")]
    pub target: Option<String>,

    /// File with a list of targets, one per line
    #[arg(short = 'T', long = "targets", value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// Apps to run, e.g. -r nmap nikto dirb
    #[arg(short = 'r', long = "run", value_name = "TOOL", num_args = 1..)]
    pub tools: Option<Vec<String>>,

    /// Output directory; without one output only goes to the screen
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Proxy to send HTTP traffic through
    #[arg(short = 'x', long, value_name = "PROXY")]
    pub proxy: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// List the supported tools and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only tool output and errors)
    #[arg(short, long)]
    pub quiet: bool,
}
