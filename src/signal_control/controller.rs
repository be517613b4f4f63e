use log::{info, warn};

use crate::congestion::table::{CongestionTable, HEAVY_LOAD_THRESHOLD};
use crate::ingestion::SignalRecord;
use crate::signal_control::signal::{SignalState, TrafficSignal};

/// Owns one [`TrafficSignal`] per configured intersection and drives them
/// all from the caller's loop.
#[derive(Debug, Default)]
pub struct SignalController {
    signals: Vec<TrafficSignal>,
}

impl SignalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the controller from configuration records, one signal per
    /// intersection. Records without an intersection name are reported and
    /// skipped.
    pub fn from_records(records: &[SignalRecord]) -> Self {
        let mut controller = Self::new();
        for record in records {
            match record.intersection.chars().next() {
                Some(id) => controller.add_signal(TrafficSignal::new(id, record.green_duration)),
                None => warn!("signal record with an empty intersection skipped"),
            }
        }
        controller
    }

    pub fn add_signal(&mut self, signal: TrafficSignal) {
        self.signals.push(signal);
    }

    pub fn signal(&self, intersection: char) -> Option<&TrafficSignal> {
        self.signals.iter().find(|s| s.intersection == intersection)
    }

    /// Current state of an intersection's signal, `None` if it has none.
    pub fn state_of(&self, intersection: char) -> Option<SignalState> {
        self.signal(intersection).map(|s| s.state())
    }

    /// Extends green durations from congestion data: every road with more
    /// than [`HEAVY_LOAD_THRESHOLD`] vehicles adds its count to the green
    /// time of the signal at its source intersection.
    pub fn apply_congestion(&mut self, table: &CongestionTable) {
        for record in table.records() {
            if record.vehicle_count <= HEAVY_LOAD_THRESHOLD {
                continue;
            }
            if let Some(signal) = self
                .signals
                .iter_mut()
                .find(|s| s.intersection == record.start)
            {
                signal.green_duration += record.vehicle_count;
                info!(
                    "intersection {} green time: {}s (updated)",
                    record.start, signal.green_duration
                );
            }
        }
    }

    /// One sweep over every signal: the most congested intersection (if
    /// any) is forced toward green, all others advance normally against the
    /// supplied elapsed-seconds clock.
    pub fn manage(&mut self, most_congested: Option<char>, now: u64) {
        for signal in &mut self.signals {
            if Some(signal.intersection) == most_congested {
                signal.force_green(now);
            } else {
                signal.advance(now);
            }
        }
    }

    /// (intersection, green duration) pairs for reporting.
    pub fn green_times(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.signals.iter().map(|s| (s.intersection, s.green_duration))
    }

    pub fn signals(&self) -> &[TrafficSignal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
