//! Error types for RoomSonic

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoomSonicError {
    /// Unknown material, dimension, material bundle or preset name, or an
    /// invalid session descriptor. Never falls back to a default.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A parameter write was attempted before the signal chains exist.
    #[error("Not initialized: {0}")]
    NotInitialized(String),

    #[error("Value out of range: {0}")]
    Range(String),

    #[error("Unknown source index: {0}")]
    UnknownSource(usize),

    /// Failure reported by the audio-graph runtime or the scene engine.
    #[error("Engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, RoomSonicError>;
