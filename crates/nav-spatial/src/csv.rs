//! Node/edge CSV import and export, enabled with the `csv` Cargo feature.
//!
//! # CSV formats
//!
//! Nodes, one row per node:
//!
//! ```csv
//! id,lat,lon
//! 2297533049,24.9102,67.0811
//! 1869080608,24.9147,67.0893
//! ```
//!
//! Edges, one row per **undirected** road segment.  An empty `weight_m`
//! means "use the haversine distance between the endpoints":
//!
//! ```csv
//! from,to,weight_m
//! 2297533049,1869080608,
//! 1869080608,42,87.5
//! ```
//!
//! Edges referencing an id absent from the nodes file fail the whole load
//! with [`SpatialError::NodeNotFound`].  The returned graph is not indexed;
//! call [`Graph::build_index`] before searching.

use std::io::{Read, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use nav_core::{GeoPoint, NodeId};

use crate::{Graph, SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Serialize, Deserialize)]
struct EdgeRecord {
    from:     i64,
    to:       i64,
    weight_m: Option<f64>,
}

fn csv_err(e: ::csv::Error) -> SpatialError {
    SpatialError::Csv(e.to_string())
}

// ── Import ────────────────────────────────────────────────────────────────────

/// Load a graph from a nodes file and an edges file.
pub fn load_graph_csv(nodes_path: &Path, edges_path: &Path) -> SpatialResult<Graph> {
    let nodes = std::fs::File::open(nodes_path)?;
    let edges = std::fs::File::open(edges_path)?;
    load_graph_reader(nodes, edges)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_graph_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<Graph> {
    let mut graph = Graph::new();

    for row in ::csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = row.map_err(csv_err)?;
        graph.add_node(NodeId(row.id), GeoPoint::new(row.lat, row.lon));
    }

    for row in ::csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = row.map_err(csv_err)?;
        let (from, to) = (NodeId(row.from), NodeId(row.to));
        match row.weight_m {
            Some(w) => graph.add_edge_weighted(from, to, w)?,
            None => {
                graph.add_edge(from, to)?;
            }
        }
    }

    debug!("loaded {} nodes, {} edges from CSV", graph.node_count(), graph.edge_count());
    Ok(graph)
}

// ── Export ────────────────────────────────────────────────────────────────────

/// Write `graph` to a nodes file and an edges file.
pub fn write_graph_csv(graph: &Graph, nodes_path: &Path, edges_path: &Path) -> SpatialResult<()> {
    let nodes = std::fs::File::create(nodes_path)?;
    let edges = std::fs::File::create(edges_path)?;
    write_graph_writer(graph, nodes, edges)
}

/// Like [`write_graph_csv`] but accepts any `Write` sinks.
///
/// Rows are sorted by id so exports are reproducible.  Each undirected edge
/// is written once, with its stored weight.
pub fn write_graph_writer<N: Write, E: Write>(graph: &Graph, nodes: N, edges: E) -> SpatialResult<()> {
    let mut ids: Vec<NodeId> = graph.nodes().keys().copied().collect();
    ids.sort_unstable();

    let mut w = ::csv::Writer::from_writer(nodes);
    for &id in &ids {
        if let Some(pos) = graph.node(id) {
            w.serialize(NodeRecord { id: id.0, lat: pos.lat, lon: pos.lon })
                .map_err(csv_err)?;
        }
    }
    w.flush()?;

    let mut w = ::csv::Writer::from_writer(edges);
    for &id in &ids {
        // A self-loop appears twice in its own list; emit every other copy.
        let mut self_loop_seen = false;
        for nb in graph.neighbors(id) {
            let emit = match id.cmp(&nb.to) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Greater => false,
                std::cmp::Ordering::Equal => {
                    self_loop_seen = !self_loop_seen;
                    self_loop_seen
                }
            };
            if emit {
                w.serialize(EdgeRecord { from: id.0, to: nb.to.0, weight_m: Some(nb.weight_m) })
                    .map_err(csv_err)?;
            }
        }
    }
    w.flush()?;
    Ok(())
}
