use std::collections::HashMap;

use log::warn;

use crate::ingestion::NetworkRecord;
use crate::road_network::intersections::{Intersection, NodeId};
use crate::road_network::segments::{RoadSegment, SegmentId};

/// Borrowed view of one road segment, as exposed to collaborators.
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub travel_time: u32,
    pub blocked: bool,
    pub under_repair: bool,
}

/// The city road network: an arena of intersections and directed segments.
///
/// Vertices and segments live in growable tables and refer to each other by
/// index, so removing an intersection can never leave a dangling reference:
/// every segment that mentions the vertex is removed in the same call.
///
/// Mutation failures (missing endpoints, missing segments) are reported via
/// the log and a `false`/`None` return; nothing here panics or aborts.
#[derive(Debug, Default)]
pub struct RoadNetwork {
    nodes: Vec<Option<Intersection>>,
    segments: Vec<Option<RoadSegment>>,
    index: HashMap<String, NodeId>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an intersection, returning its id. Adding a name that already
    /// exists is reported and returns the existing id.
    pub fn add_intersection(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            warn!("intersection {name} already exists");
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Intersection::new(name)));
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn find_intersection(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn intersection(&self, id: NodeId) -> Option<&Intersection> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Removes an intersection along with every segment that references it,
    /// as source or as destination.
    pub fn remove_intersection(&mut self, name: &str) -> bool {
        let Some(id) = self.index.remove(name) else {
            warn!("cannot remove intersection {name}: not found");
            return false;
        };
        let mut dropped = Vec::new();
        for (i, slot) in self.segments.iter_mut().enumerate() {
            if let Some(segment) = slot {
                if segment.from == id || segment.to == id {
                    dropped.push(SegmentId(i));
                    *slot = None;
                }
            }
        }
        for node in self.nodes.iter_mut().flatten() {
            node.outgoing.retain(|s| !dropped.contains(s));
        }
        self.nodes[id.0] = None;
        true
    }

    /// Adds a directed segment between two existing intersections.
    ///
    /// No reverse segment is created; symmetry requires a second explicit
    /// insertion. Duplicate segments between the same pair are allowed.
    pub fn add_segment(&mut self, start: &str, end: &str, travel_time: u32) -> Option<SegmentId> {
        let (Some(from), Some(to)) = (self.find_intersection(start), self.find_intersection(end))
        else {
            warn!("cannot add road {start} -> {end}: one or both intersections not found");
            return None;
        };
        let id = SegmentId(self.segments.len());
        self.segments.push(Some(RoadSegment::new(from, to, travel_time)));
        if let Some(node) = self.nodes[from.0].as_mut() {
            node.outgoing.push(id);
        }
        Some(id)
    }

    /// Removes the first segment matching the exact (start, end) pair.
    pub fn remove_segment(&mut self, start: &str, end: &str) -> bool {
        let Some(id) = self.find_segment(start, end) else {
            warn!("cannot remove road {start} -> {end}: not found");
            return false;
        };
        self.segments[id.0] = None;
        for node in self.nodes.iter_mut().flatten() {
            node.outgoing.retain(|&s| s != id);
        }
        true
    }

    /// Looks up the first segment with the exact (start, end) endpoints.
    pub fn find_segment(&self, start: &str, end: &str) -> Option<SegmentId> {
        let from = self.find_intersection(start)?;
        let to = self.find_intersection(end)?;
        let node = self.intersection(from)?;
        node.outgoing
            .iter()
            .copied()
            .find(|&id| self.segment(id).is_some_and(|s| s.to == to))
    }

    pub fn segment(&self, id: SegmentId) -> Option<&RoadSegment> {
        self.segments.get(id.0).and_then(Option::as_ref)
    }

    /// Marks a segment blocked or open. A missing endpoint or segment is
    /// reported and ignored.
    pub fn set_blocked(&mut self, start: &str, end: &str, blocked: bool) -> bool {
        match self.find_segment(start, end) {
            Some(id) => {
                if let Some(segment) = self.segments[id.0].as_mut() {
                    segment.blocked = blocked;
                }
                true
            }
            None => {
                warn!("cannot mark road {start} -> {end} blocked={blocked}: not found");
                false
            }
        }
    }

    /// Marks a segment under repair or not. Same failure policy as
    /// [`set_blocked`](Self::set_blocked).
    pub fn set_under_repair(&mut self, start: &str, end: &str, under_repair: bool) -> bool {
        match self.find_segment(start, end) {
            Some(id) => {
                if let Some(segment) = self.segments[id.0].as_mut() {
                    segment.under_repair = under_repair;
                }
                true
            }
            None => {
                warn!("cannot mark road {start} -> {end} under_repair={under_repair}: not found");
                false
            }
        }
    }

    /// Nominal travel time of the (start, end) segment, `None` if there is
    /// no such road.
    pub fn edge_weight(&self, start: &str, end: &str) -> Option<u32> {
        self.find_segment(start, end)
            .and_then(|id| self.segment(id))
            .map(|s| s.travel_time)
    }

    /// Names of the intersections reachable in one hop from `name`.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        let Some(id) = self.find_intersection(name) else {
            return Vec::new();
        };
        self.outgoing(id)
            .iter()
            .filter_map(|&s| self.segment(s))
            .map(|s| self.name_of(s.to))
            .collect()
    }

    pub fn intersection_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .map(|n| n.name.as_str())
            .collect()
    }

    /// All live segments as (source, destination, weight) views with their
    /// status flags.
    pub fn segments(&self) -> impl Iterator<Item = SegmentView<'_>> + '_ {
        self.segments.iter().flatten().map(|s| SegmentView {
            from: self.name_of(s.from),
            to: self.name_of(s.to),
            travel_time: s.travel_time,
            blocked: s.blocked,
            under_repair: s.under_repair,
        })
    }

    pub fn intersection_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Upper bound on node indices, for visited tables sized to the arena.
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    /// Outgoing segment ids of a node; empty for removed or unknown ids.
    pub fn outgoing(&self, id: NodeId) -> &[SegmentId] {
        self.intersection(id)
            .map(|n| n.outgoing.as_slice())
            .unwrap_or(&[])
    }

    pub fn name_of(&self, id: NodeId) -> &str {
        self.intersection(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    /// Builds the network from loader records, creating intersections the
    /// first time they are referenced.
    pub fn load_records(&mut self, records: &[NetworkRecord]) {
        for record in records {
            if record.start.is_empty() || record.end.is_empty() {
                warn!("road record with an empty intersection name skipped");
                continue;
            }
            if self.find_intersection(&record.start).is_none() {
                self.add_intersection(&record.start);
            }
            if self.find_intersection(&record.end).is_none() {
                self.add_intersection(&record.end);
            }
            self.add_segment(&record.start, &record.end, record.travel_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        for name in ["A", "B", "C"] {
            network.add_intersection(name);
        }
        network.add_segment("A", "B", 10);
        network.add_segment("B", "C", 10);
        network.add_segment("A", "C", 5);
        network
    }

    #[test]
    fn add_and_find_intersections() {
        let network = sample_network();
        assert_eq!(network.intersection_count(), 3);
        assert!(network.find_intersection("B").is_some());
        assert!(network.find_intersection("Z").is_none());
    }

    #[test]
    fn duplicate_intersection_returns_existing_id() {
        let mut network = sample_network();
        let first = network.find_intersection("A").unwrap();
        let again = network.add_intersection("A");
        assert_eq!(first, again);
        assert_eq!(network.intersection_count(), 3);
    }

    #[test]
    fn edge_weight_uses_none_as_no_edge_sentinel() {
        let network = sample_network();
        assert_eq!(network.edge_weight("A", "C"), Some(5));
        assert_eq!(network.edge_weight("C", "A"), None);
        assert_eq!(network.edge_weight("A", "Z"), None);
    }

    #[test]
    fn no_reverse_segment_is_created() {
        let network = sample_network();
        assert_eq!(network.neighbors("A"), vec!["B", "C"]);
        assert!(network.neighbors("C").is_empty());
    }

    #[test]
    fn duplicate_segments_are_allowed() {
        let mut network = sample_network();
        network.add_segment("A", "B", 12);
        let count = network
            .segments()
            .filter(|s| s.from == "A" && s.to == "B")
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn removing_an_intersection_removes_referencing_segments() {
        let mut network = sample_network();
        assert!(network.remove_intersection("B"));
        assert_eq!(network.intersection_count(), 2);
        assert_eq!(network.edge_weight("A", "B"), None);
        // Segments not touching B survive, and no adjacency list still
        // points at a removed segment.
        assert_eq!(network.edge_weight("A", "C"), Some(5));
        assert_eq!(network.segments().count(), 1);
        assert_eq!(network.neighbors("A"), vec!["C"]);
    }

    #[test]
    fn remove_segment_only_drops_the_exact_pair() {
        let mut network = sample_network();
        assert!(network.remove_segment("A", "B"));
        assert!(!network.remove_segment("A", "B"));
        assert_eq!(network.edge_weight("A", "C"), Some(5));
        assert_eq!(network.edge_weight("B", "C"), Some(10));
    }

    #[test]
    fn marking_a_missing_segment_fails_without_panicking() {
        let mut network = sample_network();
        assert!(!network.set_blocked("C", "A", true));
        assert!(!network.set_under_repair("A", "Z", true));
        assert!(network.set_blocked("A", "B", true));
        let view = network.segments().find(|s| s.from == "A" && s.to == "B");
        assert!(view.is_some_and(|s| s.blocked && !s.under_repair));
    }

    #[test]
    fn load_records_creates_vertices_on_first_reference() {
        let mut network = RoadNetwork::new();
        network.load_records(&[
            NetworkRecord {
                start: "A".into(),
                end: "B".into(),
                travel_time: 7,
            },
            NetworkRecord {
                start: "".into(),
                end: "B".into(),
                travel_time: 3,
            },
        ]);
        assert_eq!(network.intersection_count(), 2);
        assert_eq!(network.edge_weight("A", "B"), Some(7));
    }
}
