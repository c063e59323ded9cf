//! Sliding-window aggregation of GLM lightning events into tile bins.
//!
//! The aggregator owns the event store. Batches of raw records are
//! validated and appended by `ingest`, stale events are evicted by
//! `prune`, and `aggregate_tile` answers tile-scoped spatial queries by
//! binning retained events into a 256x256 Web-Mercator pixel grid at a
//! ~2 km ground resolution.

pub mod config;
pub mod store;

pub use config::AggregatorConfig;
pub use store::EventStore;

use toe_common::tile::{latlon_to_world_pixel, meters_per_pixel};
use toe_common::{now_ms, LightningEvent, RawEventRecord, TileBinSet, TileCoord, TILE_SIZE};
use tracing::debug;

/// Sliding-window TOE aggregator.
///
/// One aggregator instance owns one event store; independent instances
/// (e.g. per satellite region) can coexist. Operations are synchronous
/// and complete without suspension; a concurrent caller must serialize
/// access because even the tile query mutates the store (it re-prunes
/// before reading).
#[derive(Debug, Default)]
pub struct ToeAggregator {
    config: AggregatorConfig,
    store: EventStore,
}

impl ToeAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            store: EventStore::new(),
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Number of currently retained events.
    pub fn retained_events(&self) -> usize {
        self.store.len()
    }

    /// Ingest a batch of raw records against the wall clock.
    ///
    /// Returns the number of accepted events. Records that fail validation
    /// are skipped silently; a malformed record never raises an error.
    pub fn ingest(&mut self, batch: &[RawEventRecord]) -> usize {
        self.ingest_at(batch, now_ms())
    }

    /// Ingest a batch of raw records against an explicit "now".
    pub fn ingest_at(&mut self, batch: &[RawEventRecord], now_ms: i64) -> usize {
        let mut accepted = 0;
        for record in batch {
            if let Some(event) = LightningEvent::from_raw(record, now_ms) {
                self.store.push(event);
                accepted += 1;
            }
        }

        let evicted = self.prune(now_ms);

        debug!(
            received = batch.len(),
            accepted,
            rejected = batch.len() - accepted,
            evicted,
            retained = self.store.len(),
            "ingested event batch"
        );

        accepted
    }

    /// Evict every event older than the retention window relative to
    /// `now_ms`. Returns the number of events evicted.
    pub fn prune(&mut self, now_ms: i64) -> usize {
        self.store.prune_older_than(now_ms - self.config.window_ms)
    }

    /// Bin retained events into the requested tile against the wall clock.
    pub fn aggregate_tile(&mut self, tile: TileCoord) -> TileBinSet {
        self.aggregate_tile_at(tile, now_ms())
    }

    /// Bin retained events into the requested tile against an explicit
    /// "now". Re-prunes the store first, so this is not a read-only
    /// operation: the staleness bound holds even when no ingest has
    /// happened recently.
    pub fn aggregate_tile_at(&mut self, tile: TileCoord, now_ms: i64) -> TileBinSet {
        self.aggregate_tile_with_window(tile, self.config.window_ms, now_ms)
    }

    /// Bin retained events into the requested tile, considering only
    /// events within `window_ms` of `now_ms`.
    ///
    /// The store itself is still pruned against the configured window, so
    /// a shorter per-request window narrows one response without evicting
    /// events other requests are entitled to see.
    pub fn aggregate_tile_with_window(
        &mut self,
        tile: TileCoord,
        window_ms: i64,
        now_ms: i64,
    ) -> TileBinSet {
        self.prune(now_ms);

        let cutoff_ms = now_ms - window_ms;
        let size = TILE_SIZE as f64;
        let (origin_x, origin_y) = tile.pixel_origin();

        let mut bins = TileBinSet::new(TILE_SIZE);
        for event in self.store.iter() {
            if event.observed_at_ms < cutoff_ms {
                continue;
            }

            let (world_x, world_y) = latlon_to_world_pixel(event.lat, event.lon, tile.z);
            let px = world_x - origin_x;
            let py = world_y - origin_y;
            if !(0.0..size).contains(&px) || !(0.0..size).contains(&py) {
                continue;
            }

            // Quantization step targeting ~bin_meters of ground per bin.
            // The step depends on the event's own latitude, not on the
            // tile: per-event accuracy over exact grid alignment.
            let step_px = (self.config.bin_meters / meters_per_pixel(event.lat, tile.z))
                .round()
                .max(1.0) as u32;

            let snapped_x = (px as u32 / step_px * step_px).min(TILE_SIZE - 1);
            let snapped_y = (py as u32 / step_px * step_px).min(TILE_SIZE - 1);

            bins.accumulate(snapped_x, snapped_y, event.energy_fj);
        }

        bins
    }
}
