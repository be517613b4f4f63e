use log::warn;

use crate::ingestion::ClosureRecord;
use crate::road_network::RoadNetwork;

/// Status of a road reported by the accident/closure feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureStatus {
    Blocked,
    UnderRepair,
    Open,
}

impl ClosureStatus {
    /// Lenient parse of the loader's status column. Unknown labels are
    /// reported and yield `None` so the record can be skipped.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "blocked" => Some(ClosureStatus::Blocked),
            "under repair" | "under_repair" => Some(ClosureStatus::UnderRepair),
            "open" | "clear" => Some(ClosureStatus::Open),
            other => {
                warn!("unknown road status {other:?}; record skipped");
                None
            }
        }
    }
}

/// Accident and closure monitor: the only collaborator allowed to toggle
/// the `blocked`/`under_repair` flags on road segments. The network's
/// segment flags stay the single source of truth; the monitor only keeps a
/// history of what it applied.
#[derive(Debug, Default)]
pub struct AccidentMonitor {
    history: Vec<(String, String, ClosureStatus)>,
}

impl AccidentMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a batch of closure records to the network. Unknown statuses
    /// are skipped (with a diagnostic from the parser).
    pub fn apply_records(&mut self, network: &mut RoadNetwork, records: &[ClosureRecord]) {
        for record in records {
            if let Some(status) = ClosureStatus::parse(&record.status) {
                self.apply(network, &record.start, &record.end, status);
            }
        }
    }

    /// Applies one status change. `Open` clears both flags. A missing
    /// segment is reported by the network and leaves no history entry.
    pub fn apply(
        &mut self,
        network: &mut RoadNetwork,
        start: &str,
        end: &str,
        status: ClosureStatus,
    ) -> bool {
        let applied = match status {
            ClosureStatus::Blocked => network.set_blocked(start, end, true),
            ClosureStatus::UnderRepair => network.set_under_repair(start, end, true),
            ClosureStatus::Open => {
                let unblocked = network.set_blocked(start, end, false);
                unblocked && network.set_under_repair(start, end, false)
            }
        };
        if applied {
            self.history
                .push((start.to_string(), end.to_string(), status));
        }
        applied
    }

    /// Blocks a road after an accident.
    pub fn block_road(&mut self, network: &mut RoadNetwork, start: &str, end: &str) -> bool {
        self.apply(network, start, end, ClosureStatus::Blocked)
    }

    /// Reopens a road, clearing both flags.
    pub fn reopen_road(&mut self, network: &mut RoadNetwork, start: &str, end: &str) -> bool {
        self.apply(network, start, end, ClosureStatus::Open)
    }

    /// Roads currently blocked, straight off the network flags.
    pub fn blocked_roads(&self, network: &RoadNetwork) -> Vec<(String, String)> {
        network
            .segments()
            .filter(|s| s.blocked)
            .map(|s| (s.from.to_string(), s.to.to_string()))
            .collect()
    }

    /// Roads currently under repair.
    pub fn under_repair_roads(&self, network: &RoadNetwork) -> Vec<(String, String)> {
        network
            .segments()
            .filter(|s| s.under_repair)
            .map(|s| (s.from.to_string(), s.to.to_string()))
            .collect()
    }

    /// Everything this monitor has applied, in order.
    pub fn history(&self) -> &[(String, String, ClosureStatus)] {
        &self.history
    }
}
