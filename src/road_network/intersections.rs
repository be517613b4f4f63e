use crate::road_network::segments::SegmentId;

/// Index of an intersection in the network's vertex table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A named node in the road network.
///
/// An intersection owns the list of its outgoing road segments, stored as
/// indices into the network's segment table in insertion order.
#[derive(Debug, Clone)]
pub struct Intersection {
    /// Unique name of the intersection.
    pub name: String,
    /// Outgoing road segments, in the order they were added.
    pub(crate) outgoing: Vec<SegmentId>,
}

impl Intersection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outgoing: Vec::new(),
        }
    }
}
