//! `nav-engine`: the query surface of the `rust_nav` routing engine.
//!
//! A [`Navigator`] owns a frozen [`Graph`](nav_spatial::Graph) and the
//! [`KdTree`](nav_spatial::KdTree) built from it, and answers:
//!
//! | Method                            | Answers                                   |
//! |-----------------------------------|-------------------------------------------|
//! | [`Navigator::resolve_nearest`]    | up to `k` node ids near a coordinate      |
//! | [`Navigator::shortest_path`]      | distance + node path between two node ids |
//! | [`Navigator::build_instructions`] | turn-by-turn guidance for a node path     |
//! | [`Navigator::route_between`]      | all of the above, coordinate to coordinate|
//! | [`Navigator::route_many`]         | a batch of `route_between` queries        |
//! | [`Navigator::compare`]            | Dijkstra and A* side by side              |
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let nav = NavigatorBuilder::new(graph).config(cfg).build()?;
//! let shared = Arc::new(nav);              // query from any thread
//! // Topology changed?  Rebuild and swap, never patch in place:
//! let mut graph = Arc::try_unwrap(shared).ok().unwrap().into_graph();
//! graph.add_edge(a, b)?;
//! let shared = Arc::new(NavigatorBuilder::new(graph).build()?);
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                              |
//! |------------|-----------------------------------------------------|
//! | `parallel` | `route_many` runs on the Rayon pool.                |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.  |

pub mod builder;
pub mod config;
pub mod error;
pub mod navigator;

#[cfg(test)]
mod tests;

pub use builder::NavigatorBuilder;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use navigator::{AlgorithmComparison, Journey, Navigator};
