// signal_control/mod.rs

pub mod controller;
pub mod signal;

pub use controller::SignalController;
pub use signal::{SignalState, TrafficSignal, DEFAULT_TRANSITION_TIME};
