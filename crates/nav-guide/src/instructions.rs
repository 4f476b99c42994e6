//! Turn-by-turn instruction builder.
//!
//! Walks a node path, measuring the initial bearing of every leg.  At each
//! interior node the change of bearing `Δ = normalize(b[i+1] − b[i])` in
//! `(-180, 180]` decides whether anything is announced:
//!
//! | Condition                                   | Announced as         |
//! |---------------------------------------------|----------------------|
//! | `abs(Δ) < turn_threshold_deg`               | nothing (distance accumulates) |
//! | `abs(Δ) ≥ turn_threshold_deg`, `Δ > 0`      | Turn Right           |
//! | `abs(Δ) ≥ turn_threshold_deg`, `Δ < 0`      | Turn Left            |
//! | announced and `abs(Δ) ≤ small_angle_deg`    | Continue Straight    |
//!
//! Each instruction carries the distance travelled since the previous one,
//! so the distances of the whole list sum to the path's haversine length.

use std::fmt;

use log::trace;

use nav_core::{GeoPoint, NodeId, normalize_angle};
use nav_spatial::Graph;

use crate::{GuidanceConfig, GuideError, GuideResult};

// ── Maneuver ──────────────────────────────────────────────────────────────────

/// What the traveller does at an instruction's node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maneuver {
    Depart,
    TurnLeft,
    TurnRight,
    ContinueStraight,
    Arrive,
}

impl Maneuver {
    pub fn label(self) -> &'static str {
        match self {
            Maneuver::Depart           => "Start",
            Maneuver::TurnLeft         => "Turn Left",
            Maneuver::TurnRight        => "Turn Right",
            Maneuver::ContinueStraight => "Continue Straight",
            Maneuver::Arrive           => "Arrive",
        }
    }

    /// Classify a bearing change already known to meet the turn threshold.
    pub(crate) fn from_delta(delta_deg: f64, config: &GuidanceConfig) -> Self {
        if delta_deg.abs() <= config.small_angle_deg {
            Maneuver::ContinueStraight
        } else if delta_deg > 0.0 {
            Maneuver::TurnRight
        } else {
            Maneuver::TurnLeft
        }
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── NavInstruction ────────────────────────────────────────────────────────────

/// One step of turn-by-turn guidance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavInstruction {
    pub maneuver: Maneuver,
    /// Human-readable sentence, e.g. `"In 240 m, Turn Left at node 17"`.
    pub text: String,
    /// Distance travelled since the previous instruction, in metres.
    pub distance_m: f64,
    /// Node at which the instruction applies.
    pub node_id: NodeId,
}

/// Sum of `distance_m` over `instructions`.
pub fn total_distance_m(instructions: &[NavInstruction]) -> f64 {
    instructions.iter().map(|i| i.distance_m).sum()
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Narrate `path` as an ordered instruction list: one departure, zero or more
/// turns, one arrival.
///
/// A path with fewer than two nodes yields an empty list.
///
/// # Errors
///
/// [`GuideError::InvalidThresholds`] for a rejected `config`,
/// [`GuideError::NodeNotFound`] if a path id has no position in `graph`.
pub fn build_instructions(
    graph: &Graph,
    path: &[NodeId],
    config: &GuidanceConfig,
) -> GuideResult<Vec<NavInstruction>> {
    config.validate()?;
    if path.len() < 2 {
        return Ok(Vec::new());
    }

    let positions: Vec<GeoPoint> = path
        .iter()
        .map(|&id| graph.node(id).ok_or(GuideError::NodeNotFound(id)))
        .collect::<GuideResult<_>>()?;

    let bearings: Vec<f64> = positions.windows(2).map(|w| w[0].bearing_deg(w[1])).collect();

    let mut out = Vec::with_capacity(path.len().min(16));
    out.push(NavInstruction {
        maneuver:   Maneuver::Depart,
        text:       format!("Start at node {} and head {}", path[0].0, compass_point(bearings[0])),
        distance_m: 0.0,
        node_id:    path[0],
    });

    let mut accum_m = 0.0;
    for (i, leg) in positions.windows(2).enumerate() {
        accum_m += leg[0].distance_m(leg[1]);

        let Some(&next_bearing) = bearings.get(i + 1) else {
            break;
        };
        let delta = normalize_angle(next_bearing - bearings[i]);
        if delta.abs() < config.turn_threshold_deg {
            continue;
        }

        let maneuver = Maneuver::from_delta(delta, config);
        let at = path[i + 1];
        trace!("{maneuver} at {at}: bearing change {delta:.1}° after {accum_m:.1} m");
        out.push(NavInstruction {
            maneuver,
            text: format!("In {accum_m:.0} m, {maneuver} at node {}", at.0),
            distance_m: accum_m,
            node_id: at,
        });
        accum_m = 0.0;
    }

    let dest = path[path.len() - 1];
    out.push(NavInstruction {
        maneuver:   Maneuver::Arrive,
        text:       format!("In {accum_m:.0} m, you have arrived at your destination (node {})", dest.0),
        distance_m: accum_m,
        node_id:    dest,
    });
    Ok(out)
}

/// Eight-point compass name for a bearing in degrees.
fn compass_point(bearing_deg: f64) -> &'static str {
    const POINTS: [&str; 8] = [
        "north", "north-east", "east", "south-east", "south", "south-west", "west", "north-west",
    ];
    POINTS[((bearing_deg + 22.5).rem_euclid(360.0) / 45.0) as usize % 8]
}
