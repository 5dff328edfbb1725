//! Section store: sole owner of the ordered section list and content map.
//!
//! Every mutation works on a staged copy of the document, writes the staged
//! copy through the persistence bridge, and only then commits it. A failed
//! write leaves both memory and storage on the previous state.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::builder::errors::SectionError;
use crate::builder::kind::SectionKind;
use crate::builder::persistence::{content_records, LoadOrigin, PersistenceBridge, StoredContent};
use crate::builder::section::{Content, Section, SectionDocument, SectionId};
use crate::storage::StorageError;

/// The payload-construction view: the list plus one `{type, content}` record
/// per listed id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub sections: Vec<Section>,
    pub sections_data: BTreeMap<SectionId, StoredContent>,
}

pub struct SectionStore {
    doc: SectionDocument,
    bridge: PersistenceBridge,
}

impl SectionStore {
    /// Hydrates from storage (seeding or repairing as needed).
    pub fn open(bridge: PersistenceBridge) -> Result<(Self, LoadOrigin), StorageError> {
        let (doc, origin) = bridge.load()?;
        Ok((Self { doc, bridge }, origin))
    }

    pub fn sections(&self) -> &[Section] {
        self.doc.sections()
    }

    pub fn content(&self, id: &SectionId) -> Option<&Content> {
        self.doc.content(id)
    }

    #[cfg(test)]
    pub fn document(&self) -> &SectionDocument {
        &self.doc
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        debug_assert!(self.doc.is_consistent());
        DocumentSnapshot {
            sections: self.doc.sections().to_vec(),
            sections_data: content_records(&self.doc),
        }
    }

    /// Known kinds not yet placed, in canonical order.
    pub fn available_kinds(&self) -> Vec<SectionKind> {
        SectionKind::KNOWN
            .into_iter()
            .filter(|k| !self.doc.contains_kind(k))
            .collect()
    }

    /// Adds a new section of `kind` with empty content.
    ///
    /// Without an index the section is appended. Either way header and footer
    /// are re-pinned afterwards, so a header always lands at 0 and a footer
    /// last regardless of the requested index.
    pub fn add_section(
        &mut self,
        kind: SectionKind,
        index: Option<usize>,
    ) -> Result<Section, SectionError> {
        if self.doc.contains_kind(&kind) {
            return Err(SectionError::DuplicateType(kind));
        }

        let section = Section::new(kind);
        let mut staged = self.doc.clone();
        staged.insert(index.unwrap_or(staged.len()), section.clone());
        self.commit(staged)?;

        debug!(
            "Added {} section {} at {:?}",
            section.kind,
            section.id,
            self.doc.position(&section.id)
        );
        Ok(section)
    }

    /// Moves a section so it ends up at `target` (clamped between the pinned
    /// ends). Pinned sections cannot be moved.
    pub fn move_section(&mut self, id: &SectionId, target: usize) -> Result<(), SectionError> {
        let from = self
            .doc
            .position(id)
            .ok_or_else(|| SectionError::UnknownSectionId(id.clone()))?;
        let kind = &self.doc.sections()[from].kind;
        if kind.is_pinned() {
            return Err(SectionError::PinnedSectionMoveRejected(kind.clone()));
        }
        if from == target {
            return Ok(());
        }

        let mut staged = self.doc.clone();
        let landed = staged.relocate(from, target);
        if landed == from {
            return Ok(());
        }
        self.commit(staged)?;

        debug!("Moved section {id} from {from} to {landed}");
        Ok(())
    }

    /// Removes a section and its content. Header and footer may be removed.
    pub fn remove_section(&mut self, id: &SectionId) -> Result<Section, SectionError> {
        let mut staged = self.doc.clone();
        let removed = staged
            .remove(id)
            .ok_or_else(|| SectionError::UnknownSectionId(id.clone()))?;
        self.commit(staged)?;

        debug!("Removed {} section {id}", removed.kind);
        Ok(removed)
    }

    /// Shallow-merges `patch` into the section's content.
    pub fn update_section_content(
        &mut self,
        id: &SectionId,
        patch: Content,
    ) -> Result<(), SectionError> {
        let mut staged = self.doc.clone();
        if !staged.merge_content(id, patch) {
            return Err(SectionError::UnknownSectionId(id.clone()));
        }
        self.commit(staged)?;

        debug!("Updated content of section {id}");
        Ok(())
    }

    /// Replaces the whole session with a fresh default seed.
    pub fn reset(&mut self) -> Result<(), SectionError> {
        self.commit(SectionDocument::seed())?;
        debug!("Reset sections to defaults");
        Ok(())
    }

    fn commit(&mut self, staged: SectionDocument) -> Result<(), StorageError> {
        self.bridge.save(&staged)?;
        self.doc = staged;
        Ok(())
    }
}
