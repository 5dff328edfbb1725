//! Drop position resolution: pointer geometry to insertion index.
//!
//! Pure over `(drop_y, boxes)`: no event system, no rendering. The boxes are
//! the rendered section nodes in render order, each relative to the same
//! container as `drop_y`.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::builder::errors::SectionError;
use crate::builder::kind::SectionKind;
use crate::builder::section::{Section, SectionId};
use crate::builder::store::SectionStore;

/// Vertical extent of one rendered section node.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NodeBox {
    pub top: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// What the drag carried.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DropPayload {
    /// An already placed section being reordered.
    Section { section_id: SectionId },
    /// A new section dragged from the palette.
    Palette {
        #[serde(rename = "type")]
        kind: SectionKind,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropEvent {
    pub payload: DropPayload,
    pub drop_y: f64,
    #[serde(default)]
    pub boxes: Vec<NodeBox>,
}

/// Index of the first box whose midpoint is not above the pointer
/// (`drop_y <= midpoint`); the drop goes before that node, so a drop exactly
/// on a midpoint lands before it.
///
/// Returns `boxes.len()` (append) when the pointer is past every midpoint, and
/// `DropOutsideBounds` when there is nothing rendered to compare against.
pub fn raw_insert_index(drop_y: f64, boxes: &[NodeBox]) -> Result<usize, SectionError> {
    if boxes.is_empty() {
        return Err(SectionError::DropOutsideBounds);
    }
    Ok(boxes
        .iter()
        .position(|b| drop_y <= b.midpoint())
        .unwrap_or(boxes.len()))
}

/// Resolves the insertion index against the current list, keeping drops off
/// the pinned ends: never before a header, never at or after a footer.
pub fn resolve_insert_index(drop_y: f64, boxes: &[NodeBox], sections: &[Section]) -> usize {
    let raw = raw_insert_index(drop_y, boxes).unwrap_or_else(|e| {
        debug!("{e}; appending");
        sections.len()
    });
    let mut index = raw.min(sections.len());

    let has_header = sections.iter().any(|s| s.kind == SectionKind::Header);
    if has_header && index == 0 {
        index = 1;
    }
    if let Some(footer) = sections.iter().position(|s| s.kind == SectionKind::Footer) {
        if index >= footer {
            index = footer.saturating_sub(1);
        }
    }
    index
}

impl SectionStore {
    /// Resolves a drop and hands it to `move_section` or `add_section`.
    /// Returns the added section for palette drops.
    pub fn apply_drop(&mut self, event: &DropEvent) -> Result<Option<Section>, SectionError> {
        let index = resolve_insert_index(event.drop_y, &event.boxes, self.sections());
        let result = match &event.payload {
            DropPayload::Section { section_id } => {
                self.move_section(section_id, index).map(|()| None)
            }
            DropPayload::Palette { kind } => self.add_section(kind.clone(), Some(index)).map(Some),
        };
        if let Err(e) = &result {
            if e.is_rejection() {
                warn!("Drop rejected: {e}");
            }
        }
        result
    }
}
