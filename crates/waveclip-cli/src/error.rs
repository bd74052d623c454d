//! Error types for CLI operations.

use std::path::PathBuf;
use thiserror::Error;
use waveclip_core::StateError;

/// Errors that can occur while rendering or handling state files.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to read a WAV file
    #[error("failed to read WAV '{path}': {source}")]
    ReadWav {
        /// Path of the input file.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: hound::Error,
    },

    /// Failed to write a WAV file
    #[error("failed to write WAV '{path}': {source}")]
    WriteWav {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: hound::Error,
    },

    /// Failed to read a configuration or state file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a state file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the render configuration
    #[error("failed to parse TOML: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// Parameter key not known to the plugin
    #[error("unknown parameter '{0}' (expected drive, mix or mode)")]
    UnknownParam(String),

    /// Parameter value that cannot be interpreted
    #[error("invalid value '{value}' for parameter '{param}'")]
    InvalidValue {
        /// Parameter key.
        param: String,
        /// Offending value text.
        value: String,
    },

    /// State blob could not be decoded or written
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Input has more channels than the stereo processor accepts
    #[error("unsupported channel count {0} (expected 1 or 2)")]
    ChannelCount(u16),

    /// Output bit depth not supported by the writer
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    BitDepth(u16),
}
