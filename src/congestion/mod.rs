// congestion/mod.rs

pub mod ranking;
pub mod table;

pub use ranking::CongestionRanking;
pub use table::{CongestionTable, RoadCount, DEFAULT_BUCKET_COUNT, HEAVY_LOAD_THRESHOLD};
