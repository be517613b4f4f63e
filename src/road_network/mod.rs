// road_network/mod.rs

pub mod intersections;
pub mod network;
pub mod segments;

pub use intersections::{Intersection, NodeId};
pub use network::{RoadNetwork, SegmentView};
pub use segments::{RoadSegment, SegmentId};
