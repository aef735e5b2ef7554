use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("malformed input {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("translation failed for {id}: {source}")]
    TranslationInvocationFailed {
        id: String,
        #[source]
        source: InvocationError,
    },

    #[error("cannot write artifact {}: {source}", .path.display())]
    ArtifactWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BatchError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the run can move on to the next entry after this error.
    pub fn is_entry_local(&self) -> bool {
        matches!(self, Self::TranslationInvocationFailed { .. })
    }
}

/// Why a single translator invocation produced no usable output.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("translator exited with {}: {stderr}", describe_exit(.code))]
    Status { code: Option<i32>, stderr: String },

    #[error("translator produced no output")]
    EmptyOutput,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "signal".to_string(),
    }
}
