use anyhow::Result;
use tablr::config::Config;
use tablr::utils::logging::init_tracing;
use tracing::{info, warn};

fn print_help() {
    println!("tablr - edit tables in overlapping terminal windows");
    println!();
    println!("Usage: tablr [--generate-config] [--help]");
    println!();
    println!("  --generate-config   Print a commented default config file");
    println!("  --help              Show this message");
    println!();
    println!("Keys: Ctrl+T new window, Ctrl+Z undo, Ctrl+Y redo, Ctrl+Q quit");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        print!("{}", Config::create_default_with_comments());
        return Ok(());
    }

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let (logs, log_path) = init_tracing(&config.logging);
    if let Some(e) = config_error {
        warn!(target: "config", "using default config: {}", e);
    }
    if let Some(path) = &log_path {
        info!(target: "tablr", "writing logs to {}", path.display());
    }

    if let Err(e) = tablr::app::run_tui_app(&config, logs) {
        eprintln!("TUI Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
