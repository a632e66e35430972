use clap::Parser;
use env_logger::Env;
use std::io::{self, BufReader};
use std::process;
use webdisco::{
    cli::Cli,
    config::Config,
    dispatcher::BatchDispatcher,
    display::DisplayManager,
    interrupt::{CtrlC, InterruptHandler},
    queue::RunQueue,
    target,
    tools::ToolRegistry,
    ScanError,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    let display = DisplayManager::with_quiet(cli.quiet);

    if cli.list_tools {
        list_tools(&display);
        return;
    }

    let mut config = if let Some(config_path) = &cli.config {
        match Config::load_from_file(&config_path.to_string_lossy()) {
            Ok(config) => {
                let loaded = format!("Loaded configuration from {}", config_path.display());
                display.print_success(&loaded);
                config
            }
            Err(e) => {
                let reason = format!("Failed to load configuration: {}, using defaults", e);
                display.print_warning(&reason);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Apply CLI overrides to config
    config.apply_overrides(cli.tools.clone(), cli.output.clone(), cli.proxy.clone());

    if let Some(path) = &cli.save_config {
        match config.save_to_file(&path.to_string_lossy()) {
            Ok(()) => {
                display.print_success(&format!("Configuration written to {}", path.display()))
            }
            Err(e) => {
                display.print_error(&format!("{}", e));
                process::exit(1);
            }
        }
        return;
    }

    let queue = match RunQueue::from_sources(cli.target.as_deref(), cli.targets.as_deref()).await {
        Ok(queue) => queue,
        Err(e) => {
            display.print_error(&format!("{}, exiting!", e));
            process::exit(1);
        }
    };

    display.print_banner("webdisco - Web Target Reconnaissance", Some("Authorized Testing Only"));
    display.print_info(&format!("{} target(s) queued", queue.len()));

    let interrupts = InterruptHandler::new(BufReader::new(io::stdin()), io::stdout());
    let run_config = config.into_run_config(queue);
    let mut dispatcher = BatchDispatcher::new(run_config, interrupts, display.clone());
    let mut sink = tokio::io::stdout();
    let mut signal = CtrlC::new();

    match dispatcher.run(&mut sink, &mut signal).await {
        Ok(()) => {}
        // The prompt already said goodbye
        Err(ScanError::Aborted) => process::exit(1),
        Err(ScanError::Interrupted) => {
            display.print_error("Quitting!");
            process::exit(1);
        }
        Err(e) => {
            display.print_error(&format!("{}, exiting!", e));
            process::exit(1);
        }
    }
}

fn list_tools(display: &DisplayManager) {
    display.print_section_header("Supported tools");

    let registry = ToolRegistry::new();
    let example = match target::parse("https://example.com") {
        Ok(example) => example,
        Err(e) => {
            display.print_error(&e.to_string());
            return;
        }
    };

    for spec in ToolRegistry::specs() {
        let argv = registry.build(spec.name, &example, None).unwrap_or_default();
        display.print_tool(spec, &argv);
    }
}
