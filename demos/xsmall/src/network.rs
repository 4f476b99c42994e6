//! Synthetic road network inspired by the geography of Mobile, Alabama.
//!
//! Loaded through the CSV reader so the demo exercises the same path as a
//! real node/edge export.

use std::io::Cursor;

use anyhow::Result;

use nav_spatial::Graph;
use nav_spatial::csv::load_graph_reader;

// Ids mimic OSM node ids.  Node 900 is an unconnected survey point and
// nodes 950/951 form a private driveway island; snapping must skip both.
const NODES_CSV: &str = "\
id,lat,lon\n\
101,30.7100,-88.0700\n\
102,30.7100,-88.0500\n\
103,30.6950,-88.0500\n\
104,30.7000,-88.0300\n\
105,30.6800,-88.0600\n\
106,30.6700,-88.0300\n\
107,30.6950,-88.0650\n\
108,30.6850,-88.0400\n\
900,30.6952,-88.0498\n\
950,30.7105,-88.0712\n\
951,30.7108,-88.0716\n\
";

// Empty weight = haversine length.  The 103-104 causeway carries a detour
// weight well above its straight-line length.
const EDGES_CSV: &str = "\
from,to,weight_m\n\
101,102,\n\
101,107,\n\
102,103,\n\
107,103,\n\
107,105,\n\
105,108,\n\
103,108,\n\
103,104,4200\n\
108,106,\n\
104,106,\n\
950,951,\n\
";

pub fn build_network() -> Result<Graph> {
    Ok(load_graph_reader(Cursor::new(NODES_CSV), Cursor::new(EDGES_CSV))?)
}
