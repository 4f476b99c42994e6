//! Angular thresholds controlling when a bearing change becomes a turn.

use crate::{GuideError, GuideResult};

/// Thresholds for [`build_instructions`](crate::build_instructions).
///
/// | Field               | Default | Meaning                                       |
/// |---------------------|---------|-----------------------------------------------|
/// | `turn_threshold_deg`| 30°     | smallest bearing change announced at all     |
/// | `small_angle_deg`   | 15°     | announced changes up to this are "straight"   |
///
/// `small_angle_deg` must not exceed `turn_threshold_deg`; otherwise every
/// announced turn would be relabelled "Continue Straight".  Such
/// configurations are rejected by [`validate`](Self::validate) rather than
/// clamped.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GuidanceConfig {
    pub turn_threshold_deg: f64,
    pub small_angle_deg: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self { turn_threshold_deg: 30.0, small_angle_deg: 15.0 }
    }
}

impl GuidanceConfig {
    /// Validated constructor.
    pub fn new(turn_threshold_deg: f64, small_angle_deg: f64) -> GuideResult<Self> {
        let cfg = Self { turn_threshold_deg, small_angle_deg };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, with either threshold optionally overridden.
    pub fn with_overrides(turn_threshold_deg: Option<f64>, small_angle_deg: Option<f64>) -> GuideResult<Self> {
        let d = Self::default();
        Self::new(
            turn_threshold_deg.unwrap_or(d.turn_threshold_deg),
            small_angle_deg.unwrap_or(d.small_angle_deg),
        )
    }

    /// Require `0 <= small_angle_deg <= turn_threshold_deg <= 180`, all finite.
    pub fn validate(&self) -> GuideResult<()> {
        let (turn, small) = (self.turn_threshold_deg, self.small_angle_deg);
        let ok = turn.is_finite()
            && small.is_finite()
            && small >= 0.0
            && small <= turn
            && turn <= 180.0;
        if ok {
            Ok(())
        } else {
            Err(GuideError::InvalidThresholds { turn_threshold_deg: turn, small_angle_deg: small })
        }
    }
}
