//! `nav-core`: foundational types for the `rust_nav` routing engine.
//!
//! Every other `nav-*` crate depends on this one.  It has no `nav-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module    | Contents                                                     |
//! |-----------|--------------------------------------------------------------|
//! | [`ids`]   | `NodeId` (sparse 64-bit map id), `DenseIdx` (compact index)  |
//! | [`geo`]   | `GeoPoint`, haversine distance, bearing, angle normalisation |
//! | [`error`] | `CoreError`, `CoreResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint, bearing_deg, haversine_m, normalize_angle};
pub use ids::{DenseIdx, NodeId};
