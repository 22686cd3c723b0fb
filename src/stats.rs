//! Running trip counts per pickup zone and per (zone, hour) slot.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const HOURS_PER_DAY: usize = 24;

/// Total trips observed for one pickup zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub zone: String,
    pub count: u64,
}

/// Total trips observed for one (zone, hour-of-day) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCount {
    pub zone: String,
    pub hour: u8,
    pub count: u64,
}

/// Per-zone accumulator: the zone total plus its hour-of-day breakdown.
/// Keeping both in one entry makes `total == by_hour.sum()` hold by
/// construction.
#[derive(Debug, Default, Clone)]
struct ZoneAccum {
    total: u64,
    by_hour: [u64; HOURS_PER_DAY],
}

/// Accumulates trip counts during one ingestion pass and serves the
/// ranked top-K views.
///
/// Each instance owns its counters directly; there is no shared or global
/// state, and nothing outside the instance can mutate it.
#[derive(Debug, Default)]
pub struct TripStats {
    zones: HashMap<String, ZoneAccum>,
}

impl TripStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all accumulated counts. Called at the start of each
    /// ingestion pass.
    pub fn reset(&mut self) {
        self.zones.clear();
    }

    /// Number of distinct pickup zones observed so far.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Total trips recorded across all zones.
    pub fn total_trips(&self) -> u64 {
        self.zones.values().map(|accum| accum.total).sum()
    }

    /// Records one trip picked up in `zone` during `hour`.
    ///
    /// `zone` must already be normalized and `hour` validated into
    /// `0..24`; the parser is the only producer and guarantees both. An
    /// out-of-range hour is ignored rather than panicking.
    pub fn record(&mut self, zone: String, hour: u8) {
        let hour = usize::from(hour);
        if hour >= HOURS_PER_DAY {
            return;
        }
        let accum = self.zones.entry(zone).or_default();
        accum.total += 1;
        accum.by_hour[hour] += 1;
    }

    /// The `k` busiest zones: count descending, ties broken by zone name
    /// ascending. `k == 0` yields an empty list.
    pub fn top_zones(&self, k: usize) -> Vec<ZoneCount> {
        if k == 0 {
            return Vec::new();
        }

        let mut rows: Vec<ZoneCount> = self
            .zones
            .iter()
            .map(|(zone, accum)| ZoneCount {
                zone: zone.clone(),
                count: accum.total,
            })
            .collect();

        top_k(&mut rows, k, |a, b| {
            b.count.cmp(&a.count).then_with(|| a.zone.cmp(&b.zone))
        });
        rows
    }

    /// The `k` busiest (zone, hour) slots: count descending, ties broken
    /// by zone ascending then hour ascending. Slots that never saw a trip
    /// are not materialized. `k == 0` yields an empty list.
    pub fn top_busy_slots(&self, k: usize) -> Vec<SlotCount> {
        if k == 0 {
            return Vec::new();
        }

        let mut rows: Vec<SlotCount> = Vec::new();
        for (zone, accum) in &self.zones {
            for (hour, &count) in accum.by_hour.iter().enumerate() {
                if count > 0 {
                    rows.push(SlotCount {
                        zone: zone.clone(),
                        hour: hour as u8,
                        count,
                    });
                }
            }
        }

        top_k(&mut rows, k, |a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.zone.cmp(&b.zone))
                .then_with(|| a.hour.cmp(&b.hour))
        });
        rows
    }
}

/// Keeps the `k` best-ranked rows under `cmp` in sorted order, dropping
/// the rest. Partitions around the k-th element first so only the
/// surviving prefix is sorted.
fn top_k<T>(rows: &mut Vec<T>, k: usize, cmp: impl Fn(&T, &T) -> Ordering) {
    if rows.len() > k {
        rows.select_nth_unstable_by(k - 1, |a, b| cmp(a, b));
        rows.truncate(k);
    }
    rows.sort_unstable_by(|a, b| cmp(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(z: &str, count: u64) -> ZoneCount {
        ZoneCount {
            zone: z.to_string(),
            count,
        }
    }

    fn slot(z: &str, hour: u8, count: u64) -> SlotCount {
        SlotCount {
            zone: z.to_string(),
            hour,
            count,
        }
    }

    fn sample() -> TripStats {
        let mut stats = TripStats::new();
        stats.record("ZONEA".to_string(), 8);
        stats.record("ZONEA".to_string(), 8);
        stats.record("ZONEA".to_string(), 17);
        stats.record("ZONEB".to_string(), 9);
        stats.record("ZONEC".to_string(), 9);
        stats.record("ZONEC".to_string(), 23);
        stats.record("ZONEC".to_string(), 0);
        stats
    }

    #[test]
    fn test_empty_stats() {
        let stats = TripStats::new();
        assert_eq!(stats.zone_count(), 0);
        assert_eq!(stats.total_trips(), 0);
        assert!(stats.top_zones(5).is_empty());
        assert!(stats.top_busy_slots(5).is_empty());
    }

    #[test]
    fn test_top_zones_ordering() {
        let stats = sample();
        assert_eq!(
            stats.top_zones(10),
            vec![zone("ZONEA", 3), zone("ZONEC", 3), zone("ZONEB", 1)]
        );
    }

    #[test]
    fn test_top_zones_truncates_to_k() {
        let stats = sample();
        assert_eq!(stats.top_zones(1), vec![zone("ZONEA", 3)]);
        assert_eq!(stats.top_zones(2).len(), 2);
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        let stats = sample();
        assert!(stats.top_zones(0).is_empty());
        assert!(stats.top_busy_slots(0).is_empty());
    }

    #[test]
    fn test_top_busy_slots_ordering() {
        let stats = sample();
        assert_eq!(
            stats.top_busy_slots(10),
            vec![
                slot("ZONEA", 8, 2),
                slot("ZONEA", 17, 1),
                slot("ZONEB", 9, 1),
                slot("ZONEC", 0, 1),
                slot("ZONEC", 9, 1),
                slot("ZONEC", 23, 1),
            ]
        );
    }

    #[test]
    fn test_top_busy_slots_truncates_to_k() {
        let stats = sample();
        assert_eq!(
            stats.top_busy_slots(2),
            vec![slot("ZONEA", 8, 2), slot("ZONEA", 17, 1)]
        );
    }

    #[test]
    fn test_zone_total_equals_slot_sum() {
        let stats = sample();
        for z in stats.top_zones(usize::MAX) {
            let slot_sum: u64 = stats
                .top_busy_slots(usize::MAX)
                .into_iter()
                .filter(|s| s.zone == z.zone)
                .map(|s| s.count)
                .sum();
            assert_eq!(z.count, slot_sum, "zone {}", z.zone);
        }
    }

    #[test]
    fn test_queries_are_idempotent() {
        let stats = sample();
        assert_eq!(stats.top_zones(3), stats.top_zones(3));
        assert_eq!(stats.top_busy_slots(5), stats.top_busy_slots(5));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = sample();
        stats.reset();
        assert_eq!(stats.zone_count(), 0);
        assert_eq!(stats.total_trips(), 0);
        assert!(stats.top_zones(10).is_empty());
        assert!(stats.top_busy_slots(10).is_empty());
    }

    #[test]
    fn test_out_of_range_hour_ignored() {
        let mut stats = TripStats::new();
        stats.record("ZONEA".to_string(), 24);
        assert_eq!(stats.total_trips(), 0);
    }
}
