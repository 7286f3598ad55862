//! End-to-end pipeline integration tests
//!
//! Exercises both flows against a filesystem-backed store: raw files are
//! routed to their canonical destinations, then canonical files are loaded
//! into per-variable warehouse tables.

use sensor_router::app::adapters::object_store::{LocalStore, ObjectStore};
use sensor_router::app::adapters::warehouse::CsvDirSink;
use sensor_router::app::pipeline::Router;
use sensor_router::RouterConfig;
use std::sync::Arc;
use tempfile::TempDir;

const LOOKUP_TABLE: &str = "\
File Name,City,District,Variable,Tank,Sensor ID
SENS1,Marene,Marconi,Flow,No,S-001
TANK7,Marene,Centro,Level,Yes in,S-007
";

const RAW_CONTENT: &str = "\
Timestamp;Value;
2023-01-01 00:00:00;1.5;
2023-01-01 00:15:00;1.7;
2023-01-01 00:30:00;not-a-number;
";

struct Fixture {
    _temp_dir: TempDir,
    store: Arc<LocalStore>,
    router: Router,
    warehouse_root: std::path::PathBuf,
}

async fn fixture() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(LocalStore::new(temp_dir.path().join("store")));
    let warehouse_root = temp_dir.path().join("warehouse");
    let sink = Arc::new(CsvDirSink::new(&warehouse_root));

    store
        .put(
            "config",
            "lookup_table/lookup_table.csv",
            LOOKUP_TABLE.as_bytes().to_vec(),
            "text/csv",
        )
        .await
        .unwrap();

    let config = RouterConfig::default()
        .with_config_bucket("config")
        .with_lookup_table_key("lookup_table/lookup_table.csv")
        .with_data_bucket("data")
        .with_dataset("sensor_measurement")
        .with_workers(2);
    let router = Router::new(store.clone(), config).unwrap().with_sink(sink);

    Fixture {
        _temp_dir: temp_dir,
        store,
        router,
        warehouse_root,
    }
}

#[tokio::test]
async fn test_raw_file_routed_to_canonical_destination() {
    let fx = fixture().await;
    fx.store
        .put(
            "data",
            "incoming/SENS1_20230101_20230201.csv",
            RAW_CONTENT.as_bytes().to_vec(),
            "text/csv",
        )
        .await
        .unwrap();

    let destination = fx
        .router
        .route_raw_file("data", "incoming/SENS1_20230101_20230201.csv")
        .await
        .unwrap();

    assert_eq!(
        destination,
        "marene/marconi/flow/Marene_Marconi_Flow_20230101_20230201.csv"
    );

    let bytes = fx.store.get("data", &destination).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Sensor ID,Timestamp,Value");
    assert_eq!(lines[1], "S-001,2023-01-01 00:00:00,1.5");
    assert_eq!(lines[2], "S-001,2023-01-01 00:15:00,1.7");
    // Unparsable value coerces to an empty cell, not a failed file
    assert_eq!(lines[3], "S-001,2023-01-01 00:30:00,");
}

#[tokio::test]
async fn test_tank_sensor_gets_qualified_destination() {
    let fx = fixture().await;
    fx.store
        .put(
            "data",
            "incoming/TANK7_20230101_20230201.csv",
            RAW_CONTENT.as_bytes().to_vec(),
            "text/csv",
        )
        .await
        .unwrap();

    let destination = fx
        .router
        .route_raw_file("data", "incoming/TANK7_20230101_20230201.csv")
        .await
        .unwrap();

    assert_eq!(
        destination,
        "marene/centro/level/Marene_Centro_tank_in_Level_20230101_20230201.csv"
    );
}

#[tokio::test]
async fn test_routed_file_loads_into_variable_table() {
    let fx = fixture().await;
    fx.store
        .put(
            "data",
            "incoming/SENS1_20230101_20230201.csv",
            RAW_CONTENT.as_bytes().to_vec(),
            "text/csv",
        )
        .await
        .unwrap();

    let destination = fx
        .router
        .route_raw_file("data", "incoming/SENS1_20230101_20230201.csv")
        .await
        .unwrap();

    let job = fx
        .router
        .load_canonical_file("data", &destination)
        .await
        .unwrap();

    assert_eq!(job.table_id, "sensor_measurement.flow");
    assert_eq!(job.rows_loaded, 3);

    let table = std::fs::read_to_string(
        fx.warehouse_root.join("sensor_measurement.flow.csv"),
    )
    .unwrap();
    assert!(table.starts_with("Sensor ID,Timestamp,Value\n"));
    assert_eq!(table.lines().count(), 4);
    assert!(table.contains("S-001,2023-01-01 00:15:00,1.7"));
}

#[tokio::test]
async fn test_rerouting_overwrites_same_destination() {
    let fx = fixture().await;
    fx.store
        .put(
            "data",
            "incoming/SENS1_20230101_20230201.csv",
            RAW_CONTENT.as_bytes().to_vec(),
            "text/csv",
        )
        .await
        .unwrap();

    let first = fx
        .router
        .route_raw_file("data", "incoming/SENS1_20230101_20230201.csv")
        .await
        .unwrap();
    let second = fx
        .router
        .route_raw_file("data", "incoming/SENS1_20230101_20230201.csv")
        .await
        .unwrap();

    assert_eq!(first, second);
    let keys = fx.store.list("data", "marene/").await.unwrap();
    assert_eq!(keys.len(), 1);
}

#[tokio::test]
async fn test_replay_routes_batch_and_skips_failures() {
    let fx = fixture().await;
    for key in [
        "incoming/SENS1_20230101_20230201.csv",
        "incoming/TANK7_20230101_20230201.csv",
        "incoming/UNKNOWN_20230101_20230201.csv",
    ] {
        fx.store
            .put("data", key, RAW_CONTENT.as_bytes().to_vec(), "text/csv")
            .await
            .unwrap();
    }

    let stats = fx.router.replay_raw_prefix("data", "incoming/").await.unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 1);
    assert_eq!(fx.store.list("data", "marene/").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_canonical_file_is_not_loaded() {
    let fx = fixture().await;
    fx.store
        .put(
            "data",
            "marene/marconi/flow/bad.csv",
            b"Sensor ID,Timestamp,Value,Extra\nS-001,2023-01-01 00:00:00,1.5,x\n".to_vec(),
            "text/csv",
        )
        .await
        .unwrap();

    let result = fx
        .router
        .load_canonical_file("data", "marene/marconi/flow/bad.csv")
        .await;

    assert!(result.is_err());
    assert!(!fx.warehouse_root.join("sensor_measurement.flow.csv").exists());
}
