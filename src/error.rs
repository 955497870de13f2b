//! Error taxonomy for comment mutations.
//!
//! Every failure falls in one of three kinds. Validation failures are local
//! and the caller may drop them silently; state conflicts and persistence
//! failures carry a human-readable reason meant to be surfaced. Nothing is
//! retried here: retry is always caller-initiated.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::comment::{CommentId, VersionId};

/// Stable machine-readable code for an error, plus whether retrying the
/// same request could succeed.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Broad class of a [`ReviewError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    StateConflict,
    Persistence,
}

/// Opaque failure reason reported by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StoreFailure(pub String);

impl From<&str> for StoreFailure {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReviewError {
    #[error("comment is empty")]
    EmptyContent,
    #[error("invalid parent: {0}")]
    InvalidParent(CommentId),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("version {0} is locked")]
    Locked(VersionId),
    #[error("cannot reply to a reply: {0}")]
    ParentNotRoot(CommentId),
    #[error("comment not found: {0}")]
    NotFound(CommentId),
    #[error("save failed: {0}")]
    Persistence(#[from] StoreFailure),
}

impl ReviewError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyContent | Self::InvalidParent(_) => ErrorKind::Validation,
            Self::NotAuthenticated | Self::Locked(_) | Self::ParentNotRoot(_) | Self::NotFound(_) => {
                ErrorKind::StateConflict
            }
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl ErrorCode for ReviewError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyContent => "E_EMPTY_CONTENT",
            Self::InvalidParent(_) => "E_INVALID_PARENT",
            Self::NotAuthenticated => "E_NOT_AUTHENTICATED",
            Self::Locked(_) => "E_LOCKED",
            Self::ParentNotRoot(_) => "E_PARENT_NOT_ROOT",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Persistence(_) => "E_PERSISTENCE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
