//! Engine configuration.

use nav_guide::GuidanceConfig;
use nav_spatial::Algorithm;

use crate::{EngineError, EngineResult};

/// Tunables for a [`Navigator`](crate::Navigator).
///
/// | Field                | Default  | Meaning                                              |
/// |----------------------|----------|------------------------------------------------------|
/// | `default_algorithm`  | `AStar`  | search used by `route_between_default` / `route_many_default` |
/// | `initial_candidates` | 1        | snapped nodes tried per endpoint on the first round  |
/// | `max_candidates`     | 8        | cap for the doubling candidate expansion             |
/// | `guidance`           | 30° / 15°| turn thresholds for generated instructions           |
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub default_algorithm:  Algorithm,
    pub initial_candidates: usize,
    pub max_candidates:     usize,
    pub guidance:           GuidanceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_algorithm:  Algorithm::AStar,
            initial_candidates: 1,
            max_candidates:     8,
            guidance:           GuidanceConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.initial_candidates == 0 {
            return Err(EngineError::Config("initial_candidates must be at least 1".into()));
        }
        if self.initial_candidates > self.max_candidates {
            return Err(EngineError::Config(format!(
                "initial_candidates ({}) exceeds max_candidates ({})",
                self.initial_candidates, self.max_candidates,
            )));
        }
        self.guidance.validate()?;
        Ok(())
    }
}
