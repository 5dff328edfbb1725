use serde::Serialize;
use thiserror::Error;

use crate::builder::kind::SectionKind;
use crate::builder::section::SectionId;
use crate::storage::StorageError;

/// Everything a section operation can report.
///
/// Only `Storage` is a real failure. The rest are recovered where they occur:
/// the operation becomes a no-op (`DuplicateType`, `UnknownSectionId`,
/// `PinnedSectionMoveRejected`), the state falls back to the default seed
/// (`MalformedState`), or the drop becomes an append (`DropOutsideBounds`).
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("A section of type '{0}' already exists")]
    DuplicateType(SectionKind),

    #[error("Unknown section id: {0}")]
    UnknownSectionId(SectionId),

    #[error("Section '{0}' is pinned and cannot be moved")]
    PinnedSectionMoveRejected(SectionKind),

    #[error("Malformed stored state: {0}")]
    MalformedState(String),

    #[error("Drop position resolves to no rendered section")]
    DropOutsideBounds,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Wire code for an operation that was rejected as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    DuplicateType,
    UnknownSectionId,
    PinnedSectionMoveRejected,
}

impl SectionError {
    /// Maps no-op variants to their wire code. `None` for everything else.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            SectionError::DuplicateType(_) => Some(Rejection::DuplicateType),
            SectionError::UnknownSectionId(_) => Some(Rejection::UnknownSectionId),
            SectionError::PinnedSectionMoveRejected(_) => {
                Some(Rejection::PinnedSectionMoveRejected)
            }
            _ => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        self.rejection().is_some()
    }
}
