use crate::road_network::intersections::NodeId;

/// Index of a road segment in the network's segment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(pub usize);

/// A directed, weighted road between two intersections.
///
/// The segment is owned by its source intersection; `to` is an index into
/// the network's vertex table, which owns every intersection. The two
/// status flags are settable independently and only the accident monitor
/// is supposed to touch them.
#[derive(Debug, Clone)]
pub struct RoadSegment {
    /// Source intersection.
    pub from: NodeId,
    /// Destination intersection.
    pub to: NodeId,
    /// Nominal travel time along the road.
    pub travel_time: u32,
    /// Whether the road is closed to traffic.
    pub blocked: bool,
    /// Whether the road is under repair.
    pub under_repair: bool,
}

impl RoadSegment {
    pub fn new(from: NodeId, to: NodeId, travel_time: u32) -> Self {
        Self {
            from,
            to,
            travel_time,
            blocked: false,
            under_repair: false,
        }
    }
}
