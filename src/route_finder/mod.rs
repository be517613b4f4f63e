// route_finder/mod.rs

pub mod finder;

pub use finder::{
    leading_char_heuristic, Heuristic, PathEnumeration, PathRecord, RouteFinder,
    RouteFinderConfig,
};
