//! `nav-spatial`: road graph, spatial indexing, and shortest-path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`graph`]   | `Graph` (id-keyed nodes + adjacency), `DenseIndex` (CSR)  |
//! | [`kdtree`]  | `KdTree` nearest / k-nearest over projected coordinates   |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `AStarRouter`  |
//! | [`csv`]     | node/edge CSV import + export (feature = `"csv"` only)    |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Lifecycle
//!
//! ```text
//! add_node / add_edge  →  build_index()  →  KdTree::from_graph()  →  queries
//! ```
//!
//! Any mutation after `build_index` drops the dense index; searches then
//! fail with [`SpatialError::IndexNotBuilt`] until it is rebuilt.  The
//! `KdTree` is a snapshot and must be rebuilt separately.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `csv`   | Enables [`csv`] loading and export.                          |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod kdtree;
pub mod router;

#[cfg(feature = "csv")]
pub mod csv;


pub use error::{SpatialError, SpatialResult};
pub use graph::{DenseIndex, Graph, Neighbor};
pub use kdtree::{KdPoint, KdTree, Projection};
pub use router::{AStarRouter, Algorithm, DijkstraRouter, Route, Router, shortest_path};
