//! Error types for ingestion, indexing and sampling.

use thiserror::Error;

/// Errors surfaced by the sampling engine.
///
/// None of these are retried or defaulted away inside the crate; every
/// failure reaches the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    /// A user has no entry in the parameter or TF-IDF table.
    #[error("unknown user: {user}")]
    UnknownUser {
        /// The key that missed
        user: String,
    },

    /// An ingestion source had the wrong shape or a bad number.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput {
        /// 1-based line in the source, or 0 when not tied to a line
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// The user's bin index has no bins, so no word can be drawn.
    #[error("empty bin index for user: {user}")]
    EmptyIndex {
        /// Owner of the empty index
        user: String,
    },

    /// Generator settings that cannot produce a tweet.
    #[error("invalid generator config: {reason}")]
    InvalidConfig {
        /// Which setting is wrong
        reason: String,
    },
}

impl SynthError {
    pub fn unknown_user(user: impl Into<String>) -> Self {
        Self::UnknownUser { user: user.into() }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    pub fn empty_index(user: impl Into<String>) -> Self {
        Self::EmptyIndex { user: user.into() }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Attach a source line to a `MalformedInput`; other variants pass through.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedInput { reason, .. } => Self::MalformedInput { line, reason },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
