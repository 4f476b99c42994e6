//! xsmall: smallest end-to-end demo of the rust_nav routing engine.
//!
//! Builds an eleven-node synthetic network around Mobile, Alabama, snaps a
//! few coordinate pairs onto it, and prints routes with turn-by-turn
//! guidance.  Set `RUST_LOG=debug` (or `trace`) to watch the index builds and
//! candidate expansion.  Pass `--json` to dump the journeys as JSON.

mod network;

use std::time::Instant;

use anyhow::Result;
use log::info;

use nav_core::GeoPoint;
use nav_engine::{EngineConfig, Journey, NavigatorBuilder};
use nav_guide::total_distance_m;
use nav_spatial::Algorithm;

use network::build_network;

// ── Queries ───────────────────────────────────────────────────────────────────

const QUERIES: [(&str, GeoPoint, GeoPoint); 3] = [
    ("north side to harbour", GeoPoint::new(30.7095, -88.0690), GeoPoint::new(30.6710, -88.0310)),
    // Origin sits on the driveway island; the engine must widen its search.
    ("driveway to commerce park", GeoPoint::new(30.7107, -88.0715), GeoPoint::new(30.7000, -88.0310)),
    ("downtown loop", GeoPoint::new(30.6952, -88.0498), GeoPoint::new(30.6850, -88.0410)),
];

fn main() -> Result<()> {
    env_logger::init();
    let as_json = std::env::args().any(|a| a == "--json");

    println!("=== xsmall: rust_nav routing engine ===");

    let graph = build_network()?;
    println!("Loaded {} nodes, {} road segments", graph.node_count(), graph.edge_count());

    let nav = NavigatorBuilder::new(graph)
        .config(EngineConfig { max_candidates: 4, ..Default::default() })
        .build()?;
    println!(
        "Spatial index over {} nodes (reference latitude {:.4}°)",
        nav.index().len(),
        nav.index().reference_lat_deg(),
    );
    println!();

    let points: Vec<(GeoPoint, GeoPoint)> = QUERIES.iter().map(|&(_, a, b)| (a, b)).collect();
    let t0 = Instant::now();
    let algorithm = nav.config().default_algorithm;
    let journeys = nav.route_many_default(&points);
    info!("routed {} queries in {:.3} ms", points.len(), t0.elapsed().as_secs_f64() * 1e3);

    let mut ok: Vec<Journey> = Vec::with_capacity(journeys.len());
    for ((label, _, _), journey) in QUERIES.iter().zip(journeys) {
        let journey = journey?;
        print_journey(label, &journey, algorithm);

        if let (Some(s), Some(e)) = (journey.start, journey.end) {
            let cmp = nav.compare(s, e)?;
            println!(
                "  settled: dijkstra {} / astar {}  ({:.0}% saved)",
                cmp.dijkstra.settled,
                cmp.astar.settled,
                cmp.settled_savings() * 100.0,
            );
        }
        println!();
        ok.push(journey);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&ok)?);
    }
    Ok(())
}

fn print_journey(label: &str, j: &Journey, algorithm: Algorithm) {
    println!("── {label} ──");
    let (Some(start), Some(end)) = (j.start, j.end) else {
        println!("  no routable nodes");
        return;
    };
    if !j.is_reachable() {
        println!("  {start} -> {end}: unreachable after {} attempt(s)", j.attempts);
        return;
    }
    println!(
        "  {start} -> {end}: {:.0} m over {} segments ({} attempt(s), {})",
        j.route.distance_m,
        j.route.edge_count(),
        j.attempts,
        algorithm,
    );
    for step in &j.instructions {
        println!("  {:>8.0} m  {}", step.distance_m, step.text);
    }
    println!("  narrated {:.0} m", total_distance_m(&j.instructions));
}
