use log::warn;
use serde::Serialize;

use crate::road_network::RoadNetwork;
use crate::vehicles::Vehicle;

/// Bucket count of the original design.
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// Vehicle count at which a road is considered heavily loaded.
pub const HEAVY_LOAD_THRESHOLD: u32 = 5;

/// Peak window bounds, in elapsed time units. Travel times whose base falls
/// inside this window pass through unchanged; everything else is halved.
pub const PEAK_WINDOW_START: u32 = 3600;
pub const PEAK_WINDOW_END: u32 = 7200;

/// Observed vehicle count for one directed road, keyed by the leading
/// letters of its two intersections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoadCount {
    pub start: char,
    pub end: char,
    pub vehicle_count: u32,
}

/// Chained hash table from (start, end) pairs to vehicle counts.
///
/// The table is cleared and rebuilt wholesale on each refresh; there is no
/// incremental delete. Within one bucket's chain no two records share the
/// same pair.
#[derive(Debug)]
pub struct CongestionTable {
    buckets: Vec<Vec<RoadCount>>,
}

impl Default for CongestionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CongestionTable {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    pub fn with_buckets(count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); count.max(1)],
        }
    }

    /// `((start - 'A') * 31 + (end - 'A')) mod buckets`. Only uppercase
    /// letters name intersections; anything else is reported and refused
    /// rather than hashed as garbage.
    fn bucket_for(&self, start: char, end: char) -> Option<usize> {
        if !start.is_ascii_uppercase() || !end.is_ascii_uppercase() {
            warn!("intersection pair {start}{end} is not uppercase letters; dropped");
            return None;
        }
        let s = start as usize - 'A' as usize;
        let e = end as usize - 'A' as usize;
        Some((s * 31 + e) % self.buckets.len())
    }

    /// Records one vehicle observed on the (start, end) road: a single
    /// chain pass that bumps the matching record or appends a fresh one.
    pub fn record_observation(&mut self, start: char, end: char) -> bool {
        let Some(index) = self.bucket_for(start, end) else {
            return false;
        };
        let chain = &mut self.buckets[index];
        if let Some(record) = chain
            .iter_mut()
            .find(|r| r.start == start && r.end == end)
        {
            record.vehicle_count += 1;
        } else {
            chain.push(RoadCount {
                start,
                end,
                vehicle_count: 1,
            });
        }
        true
    }

    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
    }

    /// Clears every chain and re-derives one observation per vehicle from
    /// its current road segment (path position when a path is assigned,
    /// declared start/end otherwise).
    pub fn rebuild(&mut self, vehicles: &[Vehicle]) {
        self.clear();
        for vehicle in vehicles {
            match vehicle.current_segment() {
                Some((start, end)) => {
                    self.record_observation(start, end);
                }
                None => warn!("vehicle {} has no usable road segment; skipped", vehicle.id),
            }
        }
    }

    /// Exact-match lookup within the hashed bucket's chain.
    pub fn lookup(&self, start: char, end: char) -> Option<&RoadCount> {
        let index = self.bucket_for(start, end)?;
        self.buckets[index]
            .iter()
            .find(|r| r.start == start && r.end == end)
    }

    pub fn vehicle_count(&self, start: char, end: char) -> u32 {
        self.lookup(start, end).map(|r| r.vehicle_count).unwrap_or(0)
    }

    /// Congestion-adjusted travel time for a road, given its base time.
    ///
    /// A heavy load (count >= 5) multiplies the time by `1 + count`. The
    /// base time then decides the peak rule: inside the 3600..=7200 window
    /// the result passes through, outside it the result is halved. The
    /// inverted-looking peak rule is intentional, inherited behaviour.
    pub fn adjusted_travel_time(&self, start: char, end: char, base_time: u32) -> u32 {
        let count = self.vehicle_count(start, end);
        let mut time = base_time;
        if count >= HEAVY_LOAD_THRESHOLD {
            time = time.saturating_mul(1 + count);
        }
        if (PEAK_WINDOW_START..=PEAK_WINDOW_END).contains(&base_time) {
            time
        } else {
            time / 2
        }
    }

    /// Variant that pulls the base time from the road network's nominal
    /// segment weight. `None` when the segment does not exist.
    pub fn adjusted_travel_time_from(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
    ) -> Option<u32> {
        let base = network.edge_weight(start, end)?;
        let s = start.chars().next()?;
        let e = end.chars().next()?;
        Some(self.adjusted_travel_time(s, e, base))
    }

    /// Number of distinct roads whose count exceeds the heavy-load mark.
    pub fn congestion_event_count(&self) -> usize {
        self.records()
            .filter(|r| r.vehicle_count > HEAVY_LOAD_THRESHOLD)
            .count()
    }

    /// Snapshot enumeration of every record, bucket by bucket.
    pub fn records(&self) -> impl Iterator<Item = &RoadCount> {
        self.buckets.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }
}
