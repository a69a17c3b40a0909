//! Engine and scenario errors.

use thiserror::Error;

use vernier_core::components::{MissileId, TargetId};
use vernier_core::error::{ConfigError, GuidanceError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown missile {0:?}")]
    UnknownMissile(MissileId),

    #[error("unknown target {0:?}")]
    UnknownTarget(TargetId),

    #[error(transparent)]
    Guidance(#[from] GuidanceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid scenario: {0}")]
    Scenario(#[from] serde_json::Error),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
}
