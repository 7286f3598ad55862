//! Route command implementation
//!
//! Routes raw telemetry files to their canonical destinations, either one
//! file (by key or trigger event) or a whole prefix in batch.

use crate::app::adapters::object_store::LocalStore;
use crate::app::pipeline::{Router, RouterStats};
use crate::cli::args::RouteArgs;
use crate::cli::commands::shared;
use crate::config::RouterConfig;
use crate::Result;
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

/// Execute the route command
pub async fn run_route(args: RouteArgs) -> Result<RouterStats> {
    args.validate()?;
    shared::setup_logging(args.get_log_level(), args.quiet)?;

    let store = Arc::new(LocalStore::new(&args.store_root));
    let config = RouterConfig::default()
        .with_config_bucket(&args.config_bucket)
        .with_lookup_table_key(&args.lookup_table_key)
        .with_data_bucket(&args.data_bucket)
        .with_workers(args.workers);
    let router = Router::new(store, config)?;

    if let Some(event) =
        shared::resolve_single_event(&args.bucket, &args.key, &args.event_file)?
    {
        info!("Routing single file: {}/{}", event.bucket, event.key);
        let destination = router.route_raw_file(&event.bucket, &event.key).await?;

        if !args.quiet {
            println!(
                "{} {} -> {}/{}",
                "Routed".green().bold(),
                event.key,
                args.data_bucket,
                destination
            );
        }

        return Ok(RouterStats {
            files_processed: 1,
            ..Default::default()
        });
    }

    // Prefix mode; validate() guarantees a target was given
    let prefix = args.prefix.as_deref().unwrap_or_default();
    let stats = router.replay_raw_prefix(&args.bucket, prefix).await?;

    if !args.quiet {
        print_summary(&stats);
    }
    Ok(stats)
}

fn print_summary(stats: &RouterStats) {
    println!();
    println!("{}", "Routing complete".green().bold());
    println!("  Files routed: {}", stats.files_processed);
    if stats.files_failed > 0 {
        println!(
            "  Files failed: {}",
            stats.files_failed.to_string().red().bold()
        );
    } else {
        println!("  Files failed: 0");
    }
}
