//! Command implementations for the sensor router CLI
//!
//! Each command lives in its own module; this module dispatches based on
//! the parsed CLI arguments.

pub mod load;
pub mod lookup;
pub mod route;
pub mod shared;

use crate::app::pipeline::RouterStats;
use crate::cli::args::{Args, Commands};
use crate::Result;

/// Main command runner for the sensor router
///
/// Dispatches to the appropriate subcommand handler:
/// - `route`: raw-file routing to canonical destinations
/// - `load`: warehouse bulk loading of canonical files
/// - `lookup`: lookup table reports
pub async fn run(args: Args) -> Result<RouterStats> {
    match args.get_command() {
        Commands::Route(route_args) => route::run_route(route_args).await,
        Commands::Load(load_args) => load::run_load(load_args).await,
        Commands::Lookup(lookup_args) => lookup::run_lookup(lookup_args).await,
    }
}
