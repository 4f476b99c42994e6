//! `nav-guide`: turn-by-turn narration of a routed path.
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`config`]       | `GuidanceConfig` (turn / small-angle thresholds)      |
//! | [`instructions`] | `Maneuver`, `NavInstruction`, `build_instructions`    |
//! | [`error`]        | `GuideError`, `GuideResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types. |

pub mod config;
pub mod error;
pub mod instructions;


pub use config::GuidanceConfig;
pub use error::{GuideError, GuideResult};
pub use instructions::{Maneuver, NavInstruction, build_instructions, total_distance_m};
