//! CSV ingestion of the boundary data: road network, closures, vehicles
//! and signal configuration. Everything here is plain tabular records;
//! malformed rows are logged and skipped so one bad line never sinks a
//! whole file.

use std::error::Error;
use std::path::Path;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One road: source, destination, nominal travel time.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkRecord {
    pub start: String,
    pub end: String,
    pub travel_time: u32,
}

/// One closure report; `status` is one of Blocked, Under Repair, Open.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosureRecord {
    pub start: String,
    pub end: String,
    pub status: String,
}

/// One vehicle: id, endpoints, priority label.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub start: String,
    pub end: String,
    pub priority: String,
}

/// One signal configuration entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalRecord {
    pub intersection: String,
    pub green_duration: i32,
}

/// Reads every deserializable row of a headed CSV file, warning about and
/// skipping the rows that do not parse.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping malformed row in {}: {e}", path.display()),
        }
    }
    Ok(records)
}

pub fn load_network(path: impl AsRef<Path>) -> Result<Vec<NetworkRecord>, Box<dyn Error>> {
    read_records(path.as_ref())
}

pub fn load_closures(path: impl AsRef<Path>) -> Result<Vec<ClosureRecord>, Box<dyn Error>> {
    read_records(path.as_ref())
}

pub fn load_vehicles(path: impl AsRef<Path>) -> Result<Vec<VehicleRecord>, Box<dyn Error>> {
    read_records(path.as_ref())
}

pub fn load_signals(path: impl AsRef<Path>) -> Result<Vec<SignalRecord>, Box<dyn Error>> {
    read_records(path.as_ref())
}
