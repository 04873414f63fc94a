// main.rs - CLI entry point

use chrono::Utc;
use parambind::cli::{parse_command_line, Args, CommandDescription};
use parambind::connection::DatabaseConfig;
use parambind::params::parse_date_now;
use parambind::{Error, Result};

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "parambind=debug" } else { "parambind=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_main() -> Result<()> {
    let args: Args = argh::from_env();
    init_tracing(args.verbose);

    // Handle generate config first
    if args.generate_config {
        println!("{}", CommandDescription::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --command /path/to/command.toml");
        return Ok(());
    }

    let path = args
        .command
        .as_ref()
        .ok_or_else(|| Error::CommandLine("--command is required".to_string()))?;

    let mut description = CommandDescription::from_file(path)?;
    if args.connection {
        description.connection = true;
    }

    // A description that does not bind is never run
    let bound = description.bind()?;
    eprintln!("📄 Command '{}' accepts {}", description.name, bound.contract());

    let now = match &args.now {
        Some(text) => parse_date_now(text)?.with_timezone(&Utc),
        None => Utc::now(),
    };

    let gathered = parse_command_line(&description, &bound, &args.command_line, now)?;
    println!("{}", serde_json::to_string_pretty(&gathered)?);

    if description.connection {
        let config = DatabaseConfig::from_parsed_values(&gathered.values())?;
        config.log_verbose();
        eprintln!("🔌 Connection: {}", config);
        eprintln!("🎯 Source: {}", config.source()?);
    }

    Ok(())
}
