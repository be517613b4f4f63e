use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use log::{info, warn};

use crate::road_network::{NodeId, RoadNetwork};

/// Ceiling the original design hard-coded for paths and frontier entries.
pub const DEFAULT_CEILING: usize = 250;

/// Capacity ceilings for the route finder. Hitting a ceiling is a reported,
/// recoverable condition: the result is flagged as truncated and a warning
/// is logged, never a silent cut-off.
#[derive(Debug, Clone, Copy)]
pub struct RouteFinderConfig {
    /// Maximum number of enumerated paths kept per query.
    pub max_paths: usize,
    /// Maximum number of live entries in the best-first frontier.
    pub max_frontier: usize,
}

impl Default for RouteFinderConfig {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_CEILING,
            max_frontier: DEFAULT_CEILING,
        }
    }
}

/// Estimate of the remaining cost between two intersections, by name.
pub type Heuristic = fn(&str, &str) -> u32;

/// Absolute difference of the two names' leading bytes.
///
/// This is a placeholder, not a validated distance estimate; the informed
/// search makes no optimality promise under it. Swap in something better
/// via [`RouteFinder::with_heuristic`] when coordinates exist.
pub fn leading_char_heuristic(a: &str, b: &str) -> u32 {
    match (a.as_bytes().first(), b.as_bytes().first()) {
        (Some(&x), Some(&y)) => u32::from(x.abs_diff(y)),
        _ => 0,
    }
}

/// One enumerated route: the full vertex sequence and its weight sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    pub nodes: Vec<String>,
    pub total_weight: u32,
}

/// Result of a path enumeration. `truncated` is set when the path ceiling
/// stopped the search early.
#[derive(Debug, Clone, Default)]
pub struct PathEnumeration {
    pub paths: Vec<PathRecord>,
    pub truncated: bool,
}

/// Multi-strategy path finder over a [`RoadNetwork`].
///
/// Three strategies share the same adjacency substrate: exhaustive
/// depth-first enumeration of all simple paths, a blockage-aware variant of
/// it, and an informed single-best-path search. A breadth-first enumeration
/// of whole paths is kept as well for reporting parity with the original
/// system.
pub struct RouteFinder {
    config: RouteFinderConfig,
    heuristic: Heuristic,
}

impl Default for RouteFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteFinder {
    pub fn new() -> Self {
        Self {
            config: RouteFinderConfig::default(),
            heuristic: leading_char_heuristic,
        }
    }

    pub fn with_config(config: RouteFinderConfig) -> Self {
        Self {
            config,
            heuristic: leading_char_heuristic,
        }
    }

    /// Replaces the informed-search heuristic.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Enumerates every simple path from `start` to `end`, with weights.
    pub fn all_paths(&self, network: &RoadNetwork, start: &str, end: &str) -> PathEnumeration {
        self.enumerate(network, start, end, false)
    }

    /// Like [`all_paths`](Self::all_paths), but never crosses a blocked
    /// segment and never counts a blocked segment's weight.
    pub fn open_paths(&self, network: &RoadNetwork, start: &str, end: &str) -> PathEnumeration {
        self.enumerate(network, start, end, true)
    }

    /// First enumerated path, used as a vehicle's default route.
    pub fn default_route(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
    ) -> Option<Vec<String>> {
        let found = self.all_paths(network, start, end);
        if found.paths.is_empty() {
            warn!("no route available from {start} to {end}");
            return None;
        }
        found.paths.into_iter().next().map(|p| p.nodes)
    }

    /// Informed best-first search from `start` to `end`, skipping blocked
    /// segments. Returns the vertex sequence, or `None` when the frontier
    /// empties without reaching the destination.
    pub fn best_path(&self, network: &RoadNetwork, start: &str, end: &str) -> Option<Vec<String>> {
        let (from, to) = self.endpoints(network, start, end)?;
        let bound = network.node_bound();
        let mut best_cost = vec![u32::MAX; bound];
        let mut came_from: Vec<Option<NodeId>> = vec![None; bound];
        let mut closed = vec![false; bound];
        let mut frontier: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
        let mut capped = false;

        best_cost[from.0] = 0;
        frontier.push(Reverse((self.estimate(network, from, to), from.0)));

        while let Some(Reverse((_, index))) = frontier.pop() {
            let current = NodeId(index);
            if current == to {
                if capped {
                    self.warn_frontier_capped(start, end);
                }
                let mut path = Vec::new();
                let mut cursor = Some(to);
                while let Some(node) = cursor {
                    path.push(network.name_of(node).to_string());
                    cursor = came_from[node.0];
                }
                path.reverse();
                return Some(path);
            }
            if closed[index] {
                continue;
            }
            closed[index] = true;

            for &segment_id in network.outgoing(current) {
                let Some(segment) = network.segment(segment_id) else {
                    continue;
                };
                if segment.blocked || closed[segment.to.0] {
                    continue;
                }
                let tentative = best_cost[index].saturating_add(segment.travel_time);
                if tentative < best_cost[segment.to.0] {
                    best_cost[segment.to.0] = tentative;
                    came_from[segment.to.0] = Some(current);
                    if frontier.len() >= self.config.max_frontier {
                        capped = true;
                        continue;
                    }
                    let priority = tentative.saturating_add(self.estimate(network, segment.to, to));
                    frontier.push(Reverse((priority, segment.to.0)));
                }
            }
        }

        if capped {
            self.warn_frontier_capped(start, end);
        }
        info!("no path found between {start} and {end}");
        None
    }

    /// A refused frontier push means a cheaper relaxation may have been
    /// dropped, so any route returned afterwards can be suboptimal.
    fn warn_frontier_capped(&self, start: &str, end: &str) {
        warn!(
            "best-path frontier from {start} to {end} hit the {} entry ceiling; \
             the returned route may not be the cheapest",
            self.config.max_frontier
        );
    }

    /// Breadth-first enumeration of whole paths, in the order a queue
    /// discovers them. No blockage awareness and no shortest-path selection;
    /// vertices are marked visited only after expansion, so several paths
    /// through an early vertex can still be reported.
    pub fn breadth_first_paths(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
    ) -> PathEnumeration {
        struct Partial {
            node: NodeId,
            trail: Vec<NodeId>,
            weight: u32,
        }

        let mut result = PathEnumeration::default();
        let Some((from, to)) = self.endpoints(network, start, end) else {
            return result;
        };

        let mut visited = vec![false; network.node_bound()];
        let mut queue = VecDeque::new();
        queue.push_back(Partial {
            node: from,
            trail: vec![from],
            weight: 0,
        });

        while let Some(current) = queue.pop_front() {
            if current.node == to {
                if result.paths.len() >= self.config.max_paths {
                    result.truncated = true;
                    break;
                }
                result.paths.push(PathRecord {
                    nodes: self.names(network, &current.trail),
                    total_weight: current.weight,
                });
                continue;
            }
            for &segment_id in network.outgoing(current.node) {
                let Some(segment) = network.segment(segment_id) else {
                    continue;
                };
                if visited[segment.to.0] {
                    continue;
                }
                if queue.len() >= self.config.max_frontier {
                    result.truncated = true;
                    continue;
                }
                let mut trail = current.trail.clone();
                trail.push(segment.to);
                queue.push_back(Partial {
                    node: segment.to,
                    trail,
                    weight: current.weight.saturating_add(segment.travel_time),
                });
            }
            visited[current.node.0] = true;
        }

        if result.truncated {
            warn!("breadth-first enumeration from {start} to {end} was truncated");
        }
        result
    }

    fn enumerate(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
        avoid_blocked: bool,
    ) -> PathEnumeration {
        let mut result = PathEnumeration::default();
        let Some((from, to)) = self.endpoints(network, start, end) else {
            return result;
        };
        let mut visited = vec![false; network.node_bound()];
        let mut trail = vec![from];
        self.walk(
            network,
            from,
            to,
            avoid_blocked,
            &mut visited,
            &mut trail,
            &mut result,
        );
        if result.truncated {
            warn!(
                "path enumeration from {start} to {end} hit the {} path ceiling",
                self.config.max_paths
            );
        }
        result
    }

    /// Depth-first traversal with an explicit visited set that is unmarked
    /// on backtrack, so recursion depth is bounded by the vertex count.
    fn walk(
        &self,
        network: &RoadNetwork,
        current: NodeId,
        goal: NodeId,
        avoid_blocked: bool,
        visited: &mut [bool],
        trail: &mut Vec<NodeId>,
        out: &mut PathEnumeration,
    ) {
        if out.truncated {
            return;
        }
        visited[current.0] = true;

        if current == goal {
            if out.paths.len() >= self.config.max_paths {
                out.truncated = true;
            } else {
                out.paths.push(PathRecord {
                    nodes: self.names(network, trail),
                    total_weight: self.trail_weight(network, trail, avoid_blocked),
                });
            }
        } else {
            for &segment_id in network.outgoing(current) {
                let Some(segment) = network.segment(segment_id) else {
                    continue;
                };
                if avoid_blocked && segment.blocked {
                    continue;
                }
                if visited[segment.to.0] {
                    continue;
                }
                trail.push(segment.to);
                self.walk(network, segment.to, goal, avoid_blocked, visited, trail, out);
                trail.pop();
            }
        }

        visited[current.0] = false;
    }

    /// Sums the weights along a stored trail, taking the first segment for
    /// each consecutive pair. In the blockage-aware variant a blocked
    /// segment's weight never enters the total.
    fn trail_weight(&self, network: &RoadNetwork, trail: &[NodeId], skip_blocked: bool) -> u32 {
        let mut total = 0u32;
        for pair in trail.windows(2) {
            for &segment_id in network.outgoing(pair[0]) {
                if let Some(segment) = network.segment(segment_id) {
                    if segment.to == pair[1] {
                        if !(skip_blocked && segment.blocked) {
                            total = total.saturating_add(segment.travel_time);
                        }
                        break;
                    }
                }
            }
        }
        total
    }

    fn names(&self, network: &RoadNetwork, trail: &[NodeId]) -> Vec<String> {
        trail
            .iter()
            .map(|&node| network.name_of(node).to_string())
            .collect()
    }

    fn estimate(&self, network: &RoadNetwork, a: NodeId, b: NodeId) -> u32 {
        (self.heuristic)(network.name_of(a), network.name_of(b))
    }

    fn endpoints(
        &self,
        network: &RoadNetwork,
        start: &str,
        end: &str,
    ) -> Option<(NodeId, NodeId)> {
        match (
            network.find_intersection(start),
            network.find_intersection(end),
        ) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => {
                warn!("one or both intersections not found: {start}, {end}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A -> B (10), B -> C (10), A -> C (5), all open.
    fn diamond() -> RoadNetwork {
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
    fn all_paths_reports_every_simple_path_with_weights() {
        let network = diamond();
        let finder = RouteFinder::new();
        let found = finder.all_paths(&network, "A", "C");
        assert!(!found.truncated);
        assert_eq!(found.paths.len(), 2);
        assert_eq!(found.paths[0].nodes, vec!["A", "B", "C"]);
        assert_eq!(found.paths[0].total_weight, 20);
        assert_eq!(found.paths[1].nodes, vec!["A", "C"]);
        assert_eq!(found.paths[1].total_weight, 5);
    }

    #[test]
    fn open_paths_never_traverses_a_blocked_segment() {
        let mut network = diamond();
        network.set_blocked("A", "C", true);
        let finder = RouteFinder::new();
        let found = finder.open_paths(&network, "A", "C");
        assert_eq!(found.paths.len(), 1);
        assert_eq!(found.paths[0].nodes, vec!["A", "B", "C"]);
        for path in &found.paths {
            for pair in path.nodes.windows(2) {
                let view = network
                    .segments()
                    .find(|s| s.from == pair[0] && s.to == pair[1])
                    .unwrap();
                assert!(!view.blocked);
            }
        }
    }

    #[test]
    fn best_path_picks_the_cheap_direct_road() {
        let network = diamond();
        let finder = RouteFinder::new();
        let path = finder.best_path(&network, "A", "C").unwrap();
        assert_eq!(path, vec!["A", "C"]);
    }

    #[test]
    fn best_path_cost_is_at_most_the_best_open_enumeration() {
        let mut network = diamond();
        network.add_intersection("D");
        network.add_segment("C", "D", 3);
        network.add_segment("B", "D", 40);
        let finder = RouteFinder::new();
        let best = finder.best_path(&network, "A", "D").unwrap();
        let mut cost = 0;
        for pair in best.windows(2) {
            cost += network.edge_weight(&pair[0], &pair[1]).unwrap();
        }
        let open = finder.open_paths(&network, "A", "D");
        let min_open = open.paths.iter().map(|p| p.total_weight).min().unwrap();
        assert!(cost <= min_open);
    }

    #[test]
    fn best_path_routes_around_a_blockage() {
        let mut network = diamond();
        network.set_blocked("A", "C", true);
        let finder = RouteFinder::new();
        let path = finder.best_path(&network, "A", "C").unwrap();
        assert_eq!(path, vec!["A", "B", "C"]);
    }

    #[test]
    fn missing_endpoints_produce_empty_results() {
        let network = diamond();
        let finder = RouteFinder::new();
        assert!(finder.all_paths(&network, "A", "Z").paths.is_empty());
        assert!(finder.best_path(&network, "Z", "C").is_none());
        assert!(finder.default_route(&network, "Y", "Z").is_none());
    }

    #[test]
    fn no_path_is_reported_when_the_frontier_empties() {
        let mut network = diamond();
        network.add_intersection("X");
        let finder = RouteFinder::new();
        assert!(finder.best_path(&network, "C", "X").is_none());
    }

    #[test]
    fn enumeration_truncates_at_the_configured_ceiling() {
        let network = diamond();
        let finder = RouteFinder::with_config(RouteFinderConfig {
            max_paths: 1,
            max_frontier: DEFAULT_CEILING,
        });
        let found = finder.all_paths(&network, "A", "C");
        assert!(found.truncated);
        assert_eq!(found.paths.len(), 1);
    }

    #[test]
    fn frontier_ceiling_can_refuse_the_cheaper_relaxation() {
        // The expensive detour is relaxed first and fills the one-entry
        // frontier, so the cheap route's push is refused.
        let mut network = RoadNetwork::new();
        for name in ["A", "Y", "X", "D"] {
            network.add_intersection(name);
        }
        network.add_segment("A", "Y", 10);
        network.add_segment("A", "X", 1);
        network.add_segment("Y", "D", 10);
        network.add_segment("X", "D", 1);

        let capped = RouteFinder::with_config(RouteFinderConfig {
            max_paths: DEFAULT_CEILING,
            max_frontier: 1,
        });
        let path = capped.best_path(&network, "A", "D").unwrap();
        assert_eq!(path, vec!["A", "Y", "D"]);

        // Without the cap the cheap route wins.
        let path = RouteFinder::new().best_path(&network, "A", "D").unwrap();
        assert_eq!(path, vec!["A", "X", "D"]);
    }

    #[test]
    fn extreme_weights_saturate_instead_of_overflowing() {
        let mut network = RoadNetwork::new();
        for name in ["A", "B", "C"] {
            network.add_intersection(name);
        }
        network.add_segment("A", "B", u32::MAX);
        network.add_segment("B", "C", u32::MAX);
        let finder = RouteFinder::new();

        let found = finder.all_paths(&network, "A", "C");
        assert_eq!(found.paths[0].total_weight, u32::MAX);

        let found = finder.breadth_first_paths(&network, "A", "C");
        assert_eq!(found.paths[0].total_weight, u32::MAX);
    }

    #[test]
    fn default_route_is_the_first_enumerated_path() {
        let network = diamond();
        let finder = RouteFinder::new();
        let route = finder.default_route(&network, "A", "C").unwrap();
        assert_eq!(route, vec!["A", "B", "C"]);
    }

    #[test]
    fn breadth_first_enumeration_ignores_blockages() {
        let mut network = diamond();
        network.set_blocked("A", "C", true);
        let finder = RouteFinder::new();
        let found = finder.breadth_first_paths(&network, "A", "C");
        // Both paths are still reported; this variant is deliberately
        // blockage-unaware.
        assert_eq!(found.paths.len(), 2);
        assert_eq!(found.paths[0].nodes, vec!["A", "C"]);
        assert_eq!(found.paths[0].total_weight, 5);
        assert_eq!(found.paths[1].nodes, vec!["A", "B", "C"]);
        assert_eq!(found.paths[1].total_weight, 20);
    }

    #[test]
    fn custom_heuristic_is_used() {
        let network = diamond();
        let finder = RouteFinder::new().with_heuristic(|_, _| 0);
        let path = finder.best_path(&network, "A", "C").unwrap();
        assert_eq!(path, vec!["A", "C"]);
    }
}
