use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use rand::seq::IndexedRandom;

use city_rts::accidents::AccidentMonitor;
use city_rts::congestion::{CongestionRanking, CongestionTable, RoadCount};
use city_rts::ingestion;
use city_rts::road_network::RoadNetwork;
use city_rts::route_finder::RouteFinder;
use city_rts::signal_control::SignalController;
use city_rts::vehicles::{Priority, Vehicle, VehicleRoster};

const SWEEPS: u64 = 10;
const RANDOM_VEHICLES: usize = 5;

fn main() {
    env_logger::init();

    let dataset = std::env::args().nth(1).unwrap_or_else(|| "dataset".to_string());
    let dir = Path::new(&dataset);

    let network_records = match ingestion::load_network(dir.join("road_network.csv")) {
        Ok(records) => records,
        Err(e) => {
            log::error!("failed to load the road network: {e}");
            return;
        }
    };
    let closure_records = ingestion::load_closures(dir.join("road_closures.csv"))
        .unwrap_or_else(|e| {
            log::warn!("no closure data: {e}");
            Vec::new()
        });
    let vehicle_records = ingestion::load_vehicles(dir.join("vehicles.csv")).unwrap_or_else(|e| {
        log::warn!("no vehicle data: {e}");
        Vec::new()
    });
    let signal_records = ingestion::load_signals(dir.join("traffic_signals.csv"))
        .unwrap_or_else(|e| {
            log::warn!("no signal data: {e}");
            Vec::new()
        });

    let mut network = RoadNetwork::new();
    network.load_records(&network_records);
    println!(
        "Loaded {} intersections and {} roads",
        network.intersection_count(),
        network.segments().count()
    );

    let mut monitor = AccidentMonitor::new();
    monitor.apply_records(&mut network, &closure_records);

    let finder = RouteFinder::new();
    let mut roster = VehicleRoster::load_records(&vehicle_records);
    spawn_random_vehicles(&mut roster, &network, RANDOM_VEHICLES);
    roster.assign_paths(&finder, &network);

    let mut controller = SignalController::from_records(&signal_records);
    let mut table = CongestionTable::new();

    // The controller only moves when this loop calls it; time is whatever
    // the monotonic clock says has elapsed.
    let clock = Instant::now();
    for sweep in 0..SWEEPS {
        let now = clock.elapsed().as_secs();

        table.rebuild(roster.vehicles());
        let ranking = CongestionRanking::build(&table);
        controller.apply_congestion(&table);

        let busiest = ranking.most_congested().copied();
        controller.manage(busiest.map(|r| r.start), now);

        print_sweep(sweep, busiest, &table, &controller);
        emit_snapshot(&table);

        roster.advance_all();
        thread::sleep(Duration::from_secs(1));
    }

    print_reports(&network, &finder, &monitor, &controller);
}

/// Spawns a handful of extra vehicles between random intersections, so the
/// congestion picture moves even with a small dataset.
fn spawn_random_vehicles(roster: &mut VehicleRoster, network: &RoadNetwork, count: usize) {
    let names: Vec<String> = network
        .intersection_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if names.len() < 2 {
        return;
    }
    let mut rng = rand::rng();
    for i in 0..count {
        let start = names.choose(&mut rng).unwrap().clone();
        let end = loop {
            let candidate = names.choose(&mut rng).unwrap();
            if *candidate != start {
                break candidate.clone();
            }
        };
        roster.add(Vehicle::new(
            format!("AUTO{i:02}"),
            start,
            end,
            Priority::Low,
        ));
    }
}

fn print_sweep(
    sweep: u64,
    busiest: Option<RoadCount>,
    table: &CongestionTable,
    controller: &SignalController,
) {
    match busiest {
        Some(record) => println!(
            "Sweep {sweep}: busiest road {} -> {} ({} vehicles), {} congestion events",
            record.start,
            record.end,
            record.vehicle_count,
            table.congestion_event_count()
        ),
        None => println!("Sweep {sweep}: no traffic observed"),
    }
    for signal in controller.signals() {
        println!(
            "  Signal {}: {} (green time {}s)",
            signal.intersection,
            signal.state(),
            signal.green_duration
        );
    }
}

fn emit_snapshot(table: &CongestionTable) {
    let snapshot: Vec<&RoadCount> = table.records().collect();
    match serde_json::to_string(&snapshot) {
        Ok(json) => log::info!("congestion snapshot: {json}"),
        Err(e) => log::warn!("could not serialize the congestion snapshot: {e}"),
    }
}

fn print_reports(
    network: &RoadNetwork,
    finder: &RouteFinder,
    monitor: &AccidentMonitor,
    controller: &SignalController,
) {
    println!("--- Road statuses ---");
    for view in network.segments() {
        let mut flags = String::new();
        if view.blocked {
            flags.push_str(" [blocked]");
        }
        if view.under_repair {
            flags.push_str(" [under repair]");
        }
        println!(
            "{} -> {} (travel time {}){flags}",
            view.from, view.to, view.travel_time
        );
    }

    println!("--- Blocked roads ---");
    let blocked = monitor.blocked_roads(network);
    if blocked.is_empty() {
        println!("No roads are currently blocked.");
    } else {
        for (start, end) in blocked {
            println!("{start} -> {end} is blocked");
        }
    }
    for (start, end) in monitor.under_repair_roads(network) {
        println!("{start} -> {end} is under repair");
    }

    println!("--- Green times ---");
    for (intersection, duration) in controller.green_times() {
        println!("Intersection {intersection} green time: {duration}s");
    }

    // A route query between the first and last loaded intersections stands
    // in for the old interactive prompt.
    let names = network.intersection_names();
    if let (Some(&start), Some(&end)) = (names.first(), names.last()) {
        println!("--- Routes from {start} to {end} ---");
        let found = finder.all_paths(network, start, end);
        for path in &found.paths {
            println!(
                "Path: {} | Weight: {}",
                path.nodes.join(" "),
                path.total_weight
            );
        }
        match finder.best_path(network, start, end) {
            Some(path) => println!("Best path: {}", path.join(" ")),
            None => println!("No path found between {start} and {end}"),
        }
    }
}
