use thiserror::Error;

use nav_core::NodeId;

#[derive(Debug, Error, PartialEq)]
pub enum GuideError {
    #[error(
        "invalid guidance thresholds: turn {turn_threshold_deg}°, small angle {small_angle_deg}° \
         (need 0 <= small <= turn <= 180)"
    )]
    InvalidThresholds { turn_threshold_deg: f64, small_angle_deg: f64 },

    #[error("path node {0} has no coordinates in the graph")]
    NodeNotFound(NodeId),
}

pub type GuideResult<T> = Result<T, GuideError>;
