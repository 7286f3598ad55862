//! Tests for the routing pipeline


use crate::app::adapters::object_store::MemoryStore;
use crate::app::adapters::warehouse::MemorySink;
use crate::app::pipeline::Router;
use crate::config::RouterConfig;
use std::sync::Arc;

pub const LOOKUP_HEADER: &str = "File Name,City,District,Variable,Tank,Sensor ID";

/// A router over in-memory fakes with a seeded lookup table
pub fn test_router(lookup_rows: &[&str]) -> (Router, Arc<MemoryStore>, Arc<MemorySink>) {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());

    let mut table = String::from(LOOKUP_HEADER);
    for row in lookup_rows {
        table.push('\n');
        table.push_str(row);
    }
    store.insert("config", "lookup.csv", table.into_bytes());

    let config = RouterConfig::default()
        .with_config_bucket("config")
        .with_lookup_table_key("lookup.csv")
        .with_data_bucket("data")
        .with_dataset("sensor_measurement")
        .with_workers(2);

    let router = Router::new(store.clone(), config)
        .map(|r| r.with_sink(sink.clone()))
        .unwrap();

    (router, store, sink)
}
