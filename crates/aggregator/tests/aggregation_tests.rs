//! Aggregation property tests: rejection, windowing, tile locality, and
//! spatial quantization.

use aggregator::{AggregatorConfig, ToeAggregator};
use test_utils::{clustered_events, events_observed_at, invalid_events};
use toe_common::tile::{latlon_to_tile, latlon_to_world_pixel, meters_per_pixel};
use toe_common::{RawEventRecord, TileCoord};

const NOW_MS: i64 = 1_700_000_000_000;

fn record(lat: f64, lon: f64, energy_fj: f64, time_ms: i64) -> RawEventRecord {
    RawEventRecord {
        lat,
        lon,
        energy_fj,
        time_ms: Some(time_ms),
    }
}

// ============================================================================
// Rejection invariant
// ============================================================================

#[test]
fn test_invalid_records_contribute_nothing() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    assert_eq!(agg.ingest_at(&invalid_events(), NOW_MS), 0);
    assert_eq!(agg.retained_events(), 0);

    let bins = agg.aggregate_tile_at(TileCoord::new(4, 8, 8), NOW_MS);
    assert!(bins.is_empty());
}

#[test]
fn test_invalid_records_do_not_poison_valid_batch() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());

    let mut batch = invalid_events();
    batch.push(record(32.22, -110.97, 250.0, NOW_MS));
    let accepted = agg.ingest_at(&batch, NOW_MS);

    assert_eq!(accepted, 1);
    let tile = latlon_to_tile(32.22, -110.97, 8);
    let bins = agg.aggregate_tile_at(tile, NOW_MS);
    assert_eq!(bins.total_energy_fj(), 250.0);
}

// ============================================================================
// Window invariant
// ============================================================================

#[test]
fn test_stale_events_are_evicted() {
    let config = AggregatorConfig::default();
    let stale_time = NOW_MS - 2 * config.window_ms;
    let mut agg = ToeAggregator::new(config);

    agg.ingest_at(&events_observed_at(5, 32.22, -110.97, stale_time), NOW_MS);
    assert_eq!(agg.retained_events(), 0);

    let tile = latlon_to_tile(32.22, -110.97, 8);
    assert!(agg.aggregate_tile_at(tile, NOW_MS).is_empty());
}

#[test]
fn test_only_fresh_events_contribute() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    let window_ms = agg.config().window_ms;

    // Ingested together, but by aggregation time the old one has aged out
    let ingest_time = NOW_MS - window_ms + 60_000;
    let batch = vec![
        record(32.22, -110.97, 100.0, ingest_time),
        record(32.22, -110.97, 300.0, NOW_MS),
    ];
    assert_eq!(agg.ingest_at(&batch, ingest_time), 2);

    let tile = latlon_to_tile(32.22, -110.97, 8);
    let bins = agg.aggregate_tile_at(tile, NOW_MS + 60_001);
    assert_eq!(bins.total_energy_fj(), 300.0);
    assert_eq!(agg.retained_events(), 1);
}

// ============================================================================
// Tile locality
// ============================================================================

#[test]
fn test_event_lands_only_in_its_tile() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    agg.ingest_at(&[record(32.22, -110.97, 500.0, NOW_MS)], NOW_MS);

    let tile = latlon_to_tile(32.22, -110.97, 8);
    assert!(!agg.aggregate_tile_at(tile, NOW_MS).is_empty());

    // The same event projects outside [0,256) for every neighbor
    for (dx, dy) in [(1i64, 0i64), (-1, 0), (0, 1), (0, -1)] {
        let neighbor = TileCoord::new(
            tile.z,
            (tile.x as i64 + dx) as u32,
            (tile.y as i64 + dy) as u32,
        );
        assert!(
            agg.aggregate_tile_at(neighbor, NOW_MS).is_empty(),
            "event leaked into {}",
            neighbor
        );
    }
}

#[test]
fn test_events_across_boundary_split_between_tiles() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());

    // Two events straddling the antimeridian-side tile boundary at z=8:
    // lon just below and just above the x=49/x=50 edge near Tucson
    let edge_lon = 50.0 / 2f64.powi(8) * 360.0 - 180.0;
    let batch = vec![
        record(32.22, edge_lon - 0.01, 100.0, NOW_MS),
        record(32.22, edge_lon + 0.01, 200.0, NOW_MS),
    ];
    agg.ingest_at(&batch, NOW_MS);

    let west = agg.aggregate_tile_at(TileCoord::new(8, 49, 103), NOW_MS);
    let east = agg.aggregate_tile_at(TileCoord::new(8, 50, 103), NOW_MS);
    assert_eq!(west.total_energy_fj(), 100.0);
    assert_eq!(east.total_energy_fj(), 200.0);
}

// ============================================================================
// Quantization
// ============================================================================

#[test]
fn test_bin_pixel_snapped_to_per_event_step() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    let (lat, lon) = (32.22, -110.97);
    agg.ingest_at(&[record(lat, lon, 250.0, NOW_MS)], NOW_MS);

    let tile = latlon_to_tile(lat, lon, 8);
    let bins = agg.aggregate_tile_at(tile, NOW_MS);

    // Recompute the expected snapped pixel from the projection
    let (wx, wy) = latlon_to_world_pixel(lat, lon, 8);
    let px = (wx - tile.x as f64 * 256.0) as u32;
    let py = (wy - tile.y as f64 * 256.0) as u32;
    let step = (2000.0 / meters_per_pixel(lat, 8)).round().max(1.0) as u32;

    let expected = (px / step * step, py / step * step);
    assert!(step > 1, "2 km should span several pixels at z=8");
    assert_eq!(bins.len(), 1);
    assert_eq!(bins.energy_at(expected.0, expected.1), Some(250.0));
}

#[test]
fn test_nearby_events_share_a_bin() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());

    // Identical coordinates always quantize identically
    let batch = vec![
        record(32.22, -110.97, 100.0, NOW_MS),
        record(32.22, -110.97, 150.0, NOW_MS),
    ];
    agg.ingest_at(&batch, NOW_MS);

    let tile = latlon_to_tile(32.22, -110.97, 8);
    let bins = agg.aggregate_tile_at(tile, NOW_MS);
    assert_eq!(bins.len(), 1);
    assert_eq!(bins.total_energy_fj(), 250.0);
}

#[test]
fn test_step_is_at_least_one_pixel() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    agg.ingest_at(&[record(0.5, 0.5, 100.0, NOW_MS)], NOW_MS);

    // At z=0 a pixel spans ~156 km, far above the 2 km target; the event
    // must still land in exactly one (unsnapped) bin of the lone tile
    let bins = agg.aggregate_tile_at(TileCoord::new(0, 0, 0), NOW_MS);
    assert_eq!(bins.len(), 1);
}

// ============================================================================
// Degenerate inputs
// ============================================================================

#[test]
fn test_fresh_aggregator_yields_empty_bin_set() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    let bins = agg.aggregate_tile_at(TileCoord::new(6, 10, 25), NOW_MS);
    assert!(bins.is_empty());
    assert_eq!(bins.tile_size(), 256);
}

#[test]
fn test_out_of_range_tile_degrades_to_empty() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    agg.ingest_at(&clustered_events(20, 32.22, -110.97, 0.05, NOW_MS), NOW_MS);

    // x=200 does not exist at z=3 (valid range 0..8); no projected pixel
    // can fall inside it, so the result is empty rather than an error
    let bins = agg.aggregate_tile_at(TileCoord::new(3, 200, 0), NOW_MS);
    assert!(bins.is_empty());
}

// ============================================================================
// End-to-end cluster
// ============================================================================

#[test]
fn test_cluster_aggregates_into_covering_tile() {
    let mut agg = ToeAggregator::new(AggregatorConfig::default());
    let batch = clustered_events(50, 32.22, -110.97, 0.05, NOW_MS);
    assert_eq!(agg.ingest_at(&batch, NOW_MS), 50);

    let tile = latlon_to_tile(32.22, -110.97, 8);
    let bins = agg.aggregate_tile_at(tile, NOW_MS);

    assert!(!bins.is_empty());
    // Every event carries at least 100 fJ
    assert!(bins.total_energy_fj() >= 50.0 * 100.0);
}
