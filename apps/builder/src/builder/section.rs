//! Sections, their content, and the ordered document that holds them.
//!
//! `SectionDocument` is the whole editable state: the ordered list (render
//! order) plus a content map keyed by section id. It upholds:
//! - a header, if present, sits at index 0
//! - a footer, if present, sits at the last index
//! - section types are unique across the list
//! - ids are unique, and every listed id has exactly one content entry

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::builder::kind::SectionKind;

/// Type-specific section payload. Opaque to the ordering core.
pub type Content = Map<String, Value>;

/// Stable, opaque section identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// A fresh random id. Never collides within a session.
    pub fn generate() -> Self {
        SectionId(Uuid::new_v4().to_string())
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        SectionId(id.to_string())
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        SectionId(id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single placed section. Serialized as `{id, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub kind: SectionKind,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            id: SectionId::generate(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionDocument {
    sections: Vec<Section>,
    content: BTreeMap<SectionId, Content>,
}

/// What `SectionDocument::repair` had to fix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub duplicate_ids: usize,
    pub duplicate_types: usize,
    pub missing_content: usize,
    pub orphaned_content: usize,
    pub repinned: bool,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }
}

impl SectionDocument {
    /// The fresh-session document: one of each seed kind, empty content.
    pub fn seed() -> Self {
        let sections: Vec<Section> = SectionKind::DEFAULT_SEED
            .into_iter()
            .map(Section::new)
            .collect();
        let content = sections
            .iter()
            .map(|s| (s.id.clone(), Content::new()))
            .collect();
        Self { sections, content }
    }

    /// Builds a document from possibly inconsistent parts and repairs it.
    pub fn from_parts(
        sections: Vec<Section>,
        content: BTreeMap<SectionId, Content>,
    ) -> (Self, RepairReport) {
        let mut doc = Self { sections, content };
        let report = doc.repair();
        (doc, report)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn content(&self, id: &SectionId) -> Option<&Content> {
        self.content.get(id)
    }

    #[cfg(test)]
    pub fn content_map(&self) -> &BTreeMap<SectionId, Content> {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    pub fn contains_kind(&self, kind: &SectionKind) -> bool {
        self.sections.iter().any(|s| &s.kind == kind)
    }

    pub fn header_index(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.kind == SectionKind::Header)
    }

    pub fn footer_index(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.kind == SectionKind::Footer)
    }

    /// Splices `section` in at `index` (clamped to the list length) with empty
    /// content, then re-pins header and footer.
    pub(crate) fn insert(&mut self, index: usize, section: Section) {
        let index = index.min(self.sections.len());
        self.content.insert(section.id.clone(), Content::new());
        self.sections.insert(index, section);
        self.normalize_pins();
    }

    /// Removes the section and its content together.
    pub(crate) fn remove(&mut self, id: &SectionId) -> Option<Section> {
        let index = self.position(id)?;
        self.content.remove(id);
        Some(self.sections.remove(index))
    }

    /// Moves the section at `from` so that it ends up at `to` in the final
    /// list. `to` is clamped into the range between the pinned ends.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) -> usize {
        let section = self.sections.remove(from);
        let (lo, hi) = self.open_range();
        let to = to.clamp(lo, hi);
        self.sections.insert(to, section);
        to
    }

    /// Shallow merge: top-level keys in `patch` overwrite, others stay.
    pub(crate) fn merge_content(&mut self, id: &SectionId, patch: Content) -> bool {
        match self.content.get_mut(id) {
            Some(existing) => {
                for (key, value) in patch {
                    existing.insert(key, value);
                }
                true
            }
            None => false,
        }
    }

    /// Inclusive range of insertion slots not occupied by a pinned end.
    fn open_range(&self) -> (usize, usize) {
        let lo = usize::from(self.header_index() == Some(0));
        let hi = match self.footer_index() {
            Some(footer) if footer + 1 == self.sections.len() => footer,
            _ => self.sections.len(),
        };
        (lo, hi.max(lo))
    }

    /// Moves a header to the front and a footer to the back, keeping the
    /// relative order of everything else. Returns whether anything moved.
    pub(crate) fn normalize_pins(&mut self) -> bool {
        let mut moved = false;
        if let Some(h) = self.header_index() {
            if h != 0 {
                let header = self.sections.remove(h);
                self.sections.insert(0, header);
                moved = true;
            }
        }
        if let Some(f) = self.footer_index() {
            let last = self.sections.len() - 1;
            if f != last {
                let footer = self.sections.remove(f);
                self.sections.push(footer);
                moved = true;
            }
        }
        moved
    }

    /// Restores every document invariant, keeping the first occurrence of any
    /// duplicated id or type.
    pub(crate) fn repair(&mut self) -> RepairReport {
        let mut report = RepairReport::default();

        let mut seen_ids = HashSet::new();
        let mut seen_kinds = HashSet::new();
        self.sections.retain(|s| {
            if seen_ids.contains(&s.id) {
                report.duplicate_ids += 1;
                return false;
            }
            if seen_kinds.contains(&s.kind) {
                report.duplicate_types += 1;
                return false;
            }
            seen_ids.insert(s.id.clone());
            seen_kinds.insert(s.kind.clone());
            true
        });

        report.repinned = self.normalize_pins();

        let before = self.content.len();
        self.content.retain(|id, _| seen_ids.contains(id));
        report.orphaned_content = before - self.content.len();

        for section in &self.sections {
            if !self.content.contains_key(&section.id) {
                self.content.insert(section.id.clone(), Content::new());
                report.missing_content += 1;
            }
        }

        report
    }

    /// True when the list and the content map agree exactly.
    pub fn is_consistent(&self) -> bool {
        self.content.len() == self.sections.len()
            && self.sections.iter().all(|s| self.content.contains_key(&s.id))
    }
}
