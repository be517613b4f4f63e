//! Core of a city road traffic system: the road-network graph, a
//! multi-strategy route finder, congestion tracking with a derived
//! travel-time model, a max-heap congestion ranking, and per-intersection
//! traffic-signal state machines.
//!
//! Everything here is single-threaded and synchronous. Time is supplied by
//! the caller as elapsed seconds; nothing runs in the background.

pub mod accidents;
pub mod congestion;
pub mod ingestion;
pub mod road_network;
pub mod route_finder;
pub mod signal_control;
pub mod vehicles;
