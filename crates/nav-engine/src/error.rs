use nav_core::CoreError;
use nav_guide::GuideError;
use nav_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("guidance error: {0}")]
    Guide(#[from] GuideError),
}

pub type EngineResult<T> = Result<T, EngineError>;
