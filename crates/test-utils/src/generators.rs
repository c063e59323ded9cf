//! Synthetic lightning-event generators.
//!
//! All generators are deterministic: the same arguments always produce the
//! same batch, so tests that hash or byte-compare downstream output stay
//! reproducible without seeding an RNG.

use toe_common::RawEventRecord;

/// Deterministic fraction in [0, 1) derived from an index and a salt.
fn fraction(i: usize, salt: u64) -> f64 {
    let mut h = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(salt);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// Generate `count` valid events clustered around a center coordinate.
///
/// Positions scatter within `+/- spread_deg` of the center on both axes,
/// energies land in [100, 1000) fJ, and timestamps spread across the ten
/// minutes before `base_time_ms`.
pub fn clustered_events(
    count: usize,
    center_lat: f64,
    center_lon: f64,
    spread_deg: f64,
    base_time_ms: i64,
) -> Vec<RawEventRecord> {
    (0..count)
        .map(|i| RawEventRecord {
            lat: center_lat + (fraction(i, 1) - 0.5) * 2.0 * spread_deg,
            lon: center_lon + (fraction(i, 2) - 0.5) * 2.0 * spread_deg,
            energy_fj: 100.0 + fraction(i, 3) * 900.0,
            time_ms: Some(base_time_ms - (fraction(i, 4) * 600_000.0) as i64),
        })
        .collect()
}

/// Generate `count` valid events all observed at an explicit time.
pub fn events_observed_at(
    count: usize,
    center_lat: f64,
    center_lon: f64,
    observed_at_ms: i64,
) -> Vec<RawEventRecord> {
    (0..count)
        .map(|i| RawEventRecord {
            lat: center_lat + (fraction(i, 5) - 0.5) * 0.02,
            lon: center_lon + (fraction(i, 6) - 0.5) * 0.02,
            energy_fj: 100.0 + fraction(i, 7) * 900.0,
            time_ms: Some(observed_at_ms),
        })
        .collect()
}

/// A batch where every record fails ingest validation: non-finite fields
/// and out-of-range coordinates or energy.
pub fn invalid_events() -> Vec<RawEventRecord> {
    vec![
        RawEventRecord {
            lat: f64::NAN,
            lon: 0.0,
            energy_fj: 100.0,
            time_ms: None,
        },
        RawEventRecord {
            lat: 0.0,
            lon: f64::INFINITY,
            energy_fj: 100.0,
            time_ms: None,
        },
        RawEventRecord {
            lat: 91.0,
            lon: 0.0,
            energy_fj: 100.0,
            time_ms: None,
        },
        RawEventRecord {
            lat: 0.0,
            lon: -200.0,
            energy_fj: 100.0,
            time_ms: None,
        },
        RawEventRecord {
            lat: 0.0,
            lon: 0.0,
            energy_fj: f64::NAN,
            time_ms: None,
        },
        RawEventRecord {
            lat: 0.0,
            lon: 0.0,
            energy_fj: -5.0,
            time_ms: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustered_events_deterministic() {
        let a = clustered_events(10, 32.22, -110.97, 0.05, 1_000_000);
        let b = clustered_events(10, 32.22, -110.97, 0.05, 1_000_000);
        assert_eq!(a.len(), 10);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.lat, y.lat);
            assert_eq!(x.lon, y.lon);
            assert_eq!(x.energy_fj, y.energy_fj);
            assert_eq!(x.time_ms, y.time_ms);
        }
    }

    #[test]
    fn test_clustered_events_stay_in_bounds() {
        let batch = clustered_events(50, 32.22, -110.97, 0.05, 1_000_000);
        for record in &batch {
            assert!((record.lat - 32.22).abs() <= 0.05);
            assert!((record.lon + 110.97).abs() <= 0.05);
            assert!(record.energy_fj >= 100.0 && record.energy_fj < 1000.0);
            let t = record.time_ms.unwrap();
            assert!(t <= 1_000_000 && t > 1_000_000 - 600_000);
        }
    }

    #[test]
    fn test_invalid_events_all_rejected() {
        use toe_common::LightningEvent;
        for record in invalid_events() {
            assert!(LightningEvent::from_raw(&record, 0).is_none());
        }
    }
}
