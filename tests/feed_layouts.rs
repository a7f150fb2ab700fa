//! End-to-end tests over the public library: raw feed layouts through
//! normalization, the cache and the refresh cycle.

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use truesignal::cache::CacheManager;
use truesignal::data::{normalize_at, Field, OrderStats, ResponseShape};
use truesignal::refresh::{run_cycle, Snapshot};

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_every_layout_yields_the_same_orders() {
    let orders = json!([
        {"Sembol": "EURUSD", "Durum": "Açık", "KarZarar": "1.5"},
        {"symbol": "XAUUSD", "Status": "closed", "profit": -0.5}
    ]);
    let layouts = [
        json!({"success": true, "emirler": {"success": true, "emirler": orders.clone()}}),
        json!({"success": true, "emirler": orders.clone()}),
        json!({"success": true, "emirler": {"liste": orders.clone()}}),
        orders.clone(),
    ];

    for raw in &layouts {
        let response = normalize_at(raw, fixed_now());
        assert_eq!(
            response.records.len(),
            2,
            "{} layout lost orders",
            ResponseShape::classify(raw).name()
        );
        assert_eq!(response.records[0].text(Field::Symbol), "EURUSD");
        assert_eq!(response.records[1].text(Field::Symbol), "XAUUSD");

        let stats = OrderStats::from_records(&response.records);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.closed, 1);
    }
}

#[test]
fn test_mojibake_is_repaired_before_caching() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());

    let snapshot = run_cycle(
        Ok(json!({"success": true, "emirler": [{"Sembol": "BIST", "Durum": "AÃ§Ä±k"}]})),
        &cache,
    );

    assert_eq!(snapshot.records()[0].text(Field::Status), "Açık");
    let cached = cache.load().expect("Snapshot should be cached");
    assert_eq!(cached.records[0].text(Field::Status), "Açık");
}

#[test]
fn test_cache_survives_restart_until_expiry() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let written_at = fixed_now();

    let first = CacheManager::with_dir(temp_dir.path().to_path_buf());
    let response = normalize_at(&json!([{"Sembol": "GBPUSD"}]), written_at);
    first.store_at(&response.records, written_at);

    let second = CacheManager::with_dir(temp_dir.path().to_path_buf());
    let entry = second
        .load_at(written_at + Duration::minutes(29))
        .expect("Entry should still be fresh");
    assert_eq!(entry.records[0].text(Field::Symbol), "GBPUSD");
    assert_eq!(entry.written_at, written_at);

    assert!(second.load_at(written_at + Duration::minutes(30)).is_none());
}

#[test]
fn test_failure_layout_is_shown_live_but_not_cached() {
    let cache = CacheManager::in_memory();

    let snapshot = run_cycle(
        Ok(json!({"success": false, "emirler": [{"Sembol": "EURUSD"}]})),
        &cache,
    );

    assert!(matches!(snapshot, Snapshot::Live(ref r) if !r.success));
    assert!(snapshot.records().is_empty());
    assert!(cache.load().is_none());
}
