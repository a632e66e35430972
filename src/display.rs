use crate::tools::ToolSpec;
use colored::*;

/// Operator-facing messages. Tool output never goes through here.
#[derive(Debug, Clone)]
pub struct DisplayManager {
    use_colors: bool,
    quiet_mode: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self::with_quiet(false)
    }

    pub fn with_quiet(quiet: bool) -> Self {
        let use_colors = std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map_or(true, |term| term != "dumb");

        Self {
            use_colors,
            quiet_mode: quiet,
        }
    }

    /// Print a clean section header
    pub fn print_section_header(&self, title: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("\n{}", title.bright_cyan().bold());
            println!("{}", "─".repeat(title.chars().count()).bright_cyan());
        } else {
            println!("\n{}", title);
            println!("{}", "=".repeat(title.len()));
        }
    }

    /// Print a clean success message
    pub fn print_success(&self, message: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("  {} {}", "✓".bright_green().bold(), message.green());
        } else {
            println!("[✓] {}", message);
        }
    }

    /// Print a clean warning message
    pub fn print_warning(&self, message: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("  {} {}", "!".bright_yellow().bold(), message.yellow());
        } else {
            println!("[!] {}", message);
        }
    }

    /// Print a clean error message
    pub fn print_error(&self, message: &str) {
        if self.use_colors {
            eprintln!("  {} {}", "✗".bright_red().bold(), message.red().bold());
        } else {
            eprintln!("[✗] {}", message);
        }
    }

    /// Print a clean info message
    pub fn print_info(&self, message: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("  {} {}", "i".bright_blue().bold(), message.blue());
        } else {
            println!("[i] {}", message);
        }
    }

    /// Echo the command line about to run
    pub fn print_command(&self, argv: &[String]) {
        if self.quiet_mode { return; }

        let line = argv.join(" ");
        if self.use_colors {
            println!("  {} {}\n", "Running:".bright_blue().bold(), line.blue());
        } else {
            println!("Running: {}\n", line);
        }
    }

    /// One line per registered tool with an example invocation
    pub fn print_tool(&self, spec: &ToolSpec, example: &[String]) {
        if self.use_colors {
            println!("  {} {}", "→".bright_green(), spec.name.cyan().bold());
            println!("    └─ {}", spec.description.white());
            println!("    └─ {}", example.join(" ").bright_black());
        } else {
            println!("  → {}", spec.name);
            println!("    {}", spec.description);
            println!("    {}", example.join(" "));
        }
    }

    /// Print a clean banner with enhanced styling
    pub fn print_banner(&self, title: &str, subtitle: Option<&str>) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!();
            let rule = "─".repeat(title.len());
            println!("  {}", format!("┌─{}─┐", rule).bright_cyan());
            println!("  {} {} {}",
                "│".bright_cyan(),
                title.bright_white().bold(),
                "│".bright_cyan()
            );
            if let Some(sub) = subtitle {
                println!("  {} {} {}",
                    "│".bright_cyan(),
                    format!("{:^width$}", sub, width = title.len()).bright_black(),
                    "│".bright_cyan()
                );
            }
            println!("  {}", format!("└─{}─┘", rule).bright_cyan());
            println!();
        } else {
            let border = "=".repeat(title.len() + 4);
            println!("\n{}", border);
            println!("  {}  ", title);
            if let Some(sub) = subtitle {
                println!("  {}  ", sub);
            }
            println!("{}\n", border);
        }
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}
