//! Persistence bridge: mirrors the section document to the key-value store.
//!
//! Storage layout:
//! - `resumeSections`     → JSON array of `{id, type}` in document order
//! - `resumeSectionsData` → JSON object `id → {type, content}`; the embedded
//!   `type` is legacy and never authoritative, the list's type wins
//!
//! Loading never fails on bad data: an absent or unparsable list falls back to
//! the default seed, and inconsistent parts are repaired. Only storage I/O
//! errors propagate.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::builder::errors::SectionError;
use crate::builder::kind::SectionKind;
use crate::builder::section::{Content, Section, SectionDocument, SectionId};
use crate::storage::{KeyValueStore, StorageError};

pub const SECTIONS_KEY: &str = "resumeSections";
pub const SECTIONS_DATA_KEY: &str = "resumeSectionsData";

/// One entry of `resumeSectionsData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredContent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SectionKind>,
    #[serde(default)]
    pub content: Content,
}

/// How a document came out of storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Stored state parsed cleanly and needed no repair.
    Restored,
    /// Stored state parsed but had to be repaired.
    Repaired,
    /// Nothing usable was stored; a default seed was created.
    Seeded,
}

#[derive(Clone)]
pub struct PersistenceBridge {
    storage: Arc<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Reads the document back, seeding or repairing as needed. Any state that
    /// differs from what was stored is written back before returning.
    pub fn load(&self) -> Result<(SectionDocument, LoadOrigin), StorageError> {
        let raw_sections = self.storage.get(SECTIONS_KEY)?;
        let sections = match raw_sections.as_deref().map(decode_sections) {
            Some(Ok(sections)) => sections,
            Some(Err(e)) => {
                warn!("{e}; falling back to default sections");
                return self.seed();
            }
            None => {
                info!("No stored sections; seeding defaults");
                return self.seed();
            }
        };

        let content = match self.storage.get(SECTIONS_DATA_KEY)? {
            Some(raw) => decode_content(&raw).unwrap_or_else(|e| {
                warn!("{e}; starting every section with empty content");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };

        let (doc, report) = SectionDocument::from_parts(sections, content);
        if report.is_clean() {
            info!("Restored {} sections from storage", doc.len());
            return Ok((doc, LoadOrigin::Restored));
        }

        warn!(
            duplicate_ids = report.duplicate_ids,
            duplicate_types = report.duplicate_types,
            missing_content = report.missing_content,
            orphaned_content = report.orphaned_content,
            repinned = report.repinned,
            "Stored sections were inconsistent; repaired"
        );
        self.save(&doc)?;
        Ok((doc, LoadOrigin::Repaired))
    }

    /// Writes the full document. Both keys go out in one `set_many`.
    pub fn save(&self, doc: &SectionDocument) -> Result<(), StorageError> {
        let (sections, data) = encode(doc)?;
        self.storage
            .set_many(&[(SECTIONS_KEY, sections), (SECTIONS_DATA_KEY, data)])
    }

    fn seed(&self) -> Result<(SectionDocument, LoadOrigin), StorageError> {
        let doc = SectionDocument::seed();
        self.save(&doc)?;
        Ok((doc, LoadOrigin::Seeded))
    }
}

/// The `{type, content}` view of every listed section, keyed by id.
pub fn content_records(doc: &SectionDocument) -> BTreeMap<SectionId, StoredContent> {
    doc.sections()
        .iter()
        .map(|s| {
            let content = doc.content(&s.id).cloned().unwrap_or_default();
            (
                s.id.clone(),
                StoredContent {
                    kind: Some(s.kind.clone()),
                    content,
                },
            )
        })
        .collect()
}

/// Serializes a document into the two stored values.
pub fn encode(doc: &SectionDocument) -> Result<(String, String), StorageError> {
    let sections = serde_json::to_string(doc.sections())?;
    let data = serde_json::to_string(&content_records(doc))?;
    Ok((sections, data))
}

fn decode_sections(raw: &str) -> Result<Vec<Section>, SectionError> {
    serde_json::from_str(raw)
        .map_err(|e| SectionError::MalformedState(format!("{SECTIONS_KEY}: {e}")))
}

fn decode_content(raw: &str) -> Result<BTreeMap<SectionId, Content>, SectionError> {
    let records: BTreeMap<SectionId, serde_json::Value> = serde_json::from_str(raw)
        .map_err(|e| SectionError::MalformedState(format!("{SECTIONS_DATA_KEY}: {e}")))?;

    // A single malformed record only costs that section its content.
    Ok(records
        .into_iter()
        .filter_map(|(id, value)| match serde_json::from_value::<StoredContent>(value) {
            Ok(record) => Some((id, record.content)),
            Err(e) => {
                warn!("Dropping malformed content for section {id}: {e}");
                None
            }
        })
        .collect())
}
