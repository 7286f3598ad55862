use clap::Parser;
use sensor_router::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => {
                result
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(sensor_router::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Sensor Router - Water Network Telemetry File Router");
    println!("===================================================");
    println!();
    println!("Routes raw sensor telemetry files to deterministic canonical locations,");
    println!("normalizes their content into the {{Sensor ID, Timestamp, Value}} schema,");
    println!("and bulk-loads canonical files into per-variable warehouse tables.");
    println!();
    println!("USAGE:");
    println!("    sensor-router <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    route       Route raw files to canonical destinations (main command)");
    println!("    load        Load canonical files into the warehouse sink");
    println!("    lookup      Report on the lookup table contents");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Route a single raw file by object key:");
    println!("    sensor-router route --store-root ./store --key raw/SENS1_20230101_20230201.csv");
    println!();
    println!("    # Replay every raw file under a prefix:");
    println!("    sensor-router route --store-root ./store --prefix raw/ -j 8");
    println!();
    println!("    # Load a canonical file into the warehouse:");
    println!("    sensor-router load --store-root ./store \\");
    println!("                       --key marene/marconi/flow/Marene_Marconi_Flow_20230101_20230201.csv");
    println!();
    println!("    # Inspect the lookup table:");
    println!("    sensor-router lookup --store-root ./store --detailed --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    sensor-router <COMMAND> --help");
}
