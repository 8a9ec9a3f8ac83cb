use crate::pos::BlockPos;

/// Faults reported by a target-state backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("position {0} is out of bounds")]
    OutOfBounds(BlockPos),
    #[error("position {0} is not loaded")]
    Unloaded(BlockPos),
    #[error("no container at {0} to attach data to")]
    NoContainer(BlockPos),
    #[error("target backend unavailable: {0}")]
    Unavailable(String),
}

/// Error type for pipeline construction and consumption.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// `pull()` was called on a stage with nothing left to yield.
    #[error("stage exhausted: no placement action left to pull")]
    Exhausted,
    #[error("malformed payload at {pos}: {reason}")]
    Malformed { pos: BlockPos, reason: String },
    #[error("failed to decode payload at {pos}: {message}")]
    Decode { pos: BlockPos, message: String },
    #[error("failed to encode payload at {pos}: {message}")]
    Encode { pos: BlockPos, message: String },
    #[error("invalid resource id: {0:?}")]
    InvalidResourceId(String),
    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Error type for loading driver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
