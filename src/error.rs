//! Error types for battle configuration and the front-end.

/// A battle that cannot start because its configuration is unusable.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A numeric setting is out of its legal range
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Phase thresholds must strictly descend
    #[error("phase thresholds must strictly descend, found {previous} then {next}")]
    ThresholdsNotDescending { previous: f32, next: f32 },

    /// A phase threshold lies outside the open interval (0, 1)
    #[error("phase threshold {0} is outside (0, 1)")]
    ThresholdOutOfRange(f32),

    /// Every threshold opens one more phase
    #[error("{thresholds} thresholds require {} phases, director defines {phases}", .thresholds + 1)]
    PhaseCountMismatch { thresholds: usize, phases: usize },

    /// A phase has no pattern generator
    #[error("phase {phase} (\"{name}\") has no pattern generator")]
    MissingPattern { phase: u8, name: String },

    /// Config file could not be parsed
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for running a battle.
#[derive(thiserror::Error, Debug)]
pub enum BattleError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
