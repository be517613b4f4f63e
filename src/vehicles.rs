use log::warn;

use crate::ingestion::VehicleRecord;
use crate::road_network::RoadNetwork;
use crate::route_finder::RouteFinder;

/// Priority level of a vehicle. High-priority vehicles (emergency traffic)
/// are routed with the informed search instead of the default route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Low,
}

impl Priority {
    /// Lenient parse of the loader's priority column.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" | "" => Priority::Low,
            other => {
                warn!("unknown priority level {other:?}, treating as low");
                Priority::Low
            }
        }
    }
}

/// A vehicle travelling through the network.
///
/// `start` and `end` are fixed at creation; the assigned path and the
/// position within it change as the vehicle moves. The congestion table
/// reads the current road segment off these fields.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub start: String,
    pub end: String,
    pub priority: Priority,
    path: Vec<String>,
    position: usize,
}

impl Vehicle {
    pub fn new(id: String, start: String, end: String, priority: Priority) -> Self {
        Self {
            id,
            start,
            end,
            priority,
            path: Vec::new(),
            position: 0,
        }
    }

    /// Assigns a route. The path must begin at the vehicle's start
    /// intersection; anything else is reported and rejected.
    pub fn set_path(&mut self, path: Vec<String>) -> bool {
        if path.first().map(String::as_str) != Some(self.start.as_str()) {
            warn!(
                "vehicle {}: path must begin at {}; assignment rejected",
                self.id, self.start
            );
            return false;
        }
        self.path = path;
        self.position = 0;
        true
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_path(&self) -> bool {
        self.path.len() >= 2
    }

    /// Moves to the next intersection of the assigned path, if any is left.
    pub fn move_forward(&mut self) -> bool {
        if self.position + 1 < self.path.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// The road the vehicle currently occupies, as the leading letters of
    /// its two intersections. Falls back to the declared start/end when no
    /// path is assigned (or the path has run out). `None` only when a name
    /// is empty.
    pub fn current_segment(&self) -> Option<(char, char)> {
        let mut start = self
            .path
            .get(self.position)
            .and_then(|name| name.chars().next());
        let mut end = self
            .path
            .get(self.position + 1)
            .and_then(|name| name.chars().next());
        if start.is_none() {
            start = self.start.chars().next();
        }
        if end.is_none() {
            end = self.end.chars().next();
        }
        match (start, end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }
}

/// The vehicle roster: the list surface the core needs from the loader,
/// nothing more.
#[derive(Debug, Default)]
pub struct VehicleRoster {
    vehicles: Vec<Vehicle>,
}

impl VehicleRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the roster from loader records, skipping records missing an
    /// id or an endpoint.
    pub fn load_records(records: &[VehicleRecord]) -> Self {
        let mut roster = Self::new();
        for record in records {
            if record.id.is_empty() || record.start.is_empty() || record.end.is_empty() {
                warn!("vehicle record with empty fields skipped");
                continue;
            }
            roster.add(Vehicle::new(
                record.id.clone(),
                record.start.clone(),
                record.end.clone(),
                Priority::parse(&record.priority),
            ));
        }
        roster
    }

    pub fn add(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.vehicles.len();
        self.vehicles.retain(|v| v.id != id);
        if self.vehicles.len() == before {
            warn!("vehicle {id} not found; nothing removed");
            false
        } else {
            true
        }
    }

    pub fn find(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Routes every vehicle that has no path yet: high-priority vehicles
    /// get the informed best path, the rest get the default first-found
    /// route. Unroutable vehicles are reported and left without a path.
    pub fn assign_paths(&mut self, finder: &RouteFinder, network: &RoadNetwork) {
        for vehicle in &mut self.vehicles {
            if vehicle.has_path() {
                continue;
            }
            let route = match vehicle.priority {
                Priority::High => finder.best_path(network, &vehicle.start, &vehicle.end),
                Priority::Low => finder.default_route(network, &vehicle.start, &vehicle.end),
            };
            match route {
                Some(path) => {
                    vehicle.set_path(path);
                }
                None => warn!(
                    "vehicle {} could not be routed from {} to {}",
                    vehicle.id, vehicle.start, vehicle.end
                ),
            }
        }
    }

    /// Advances every vehicle one intersection along its path.
    pub fn advance_all(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.move_forward();
        }
    }
}
