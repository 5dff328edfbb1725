//! Template selector: which layout template is active.
//!
//! Stored as a plain string under `selectedTemplate`. Independent of the
//! section list: switching templates never touches section order.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

pub const TEMPLATE_KEY: &str = "selectedTemplate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimal,
    Creative,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Minimal,
        TemplateId::Creative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::Creative => "creative",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template '{}'", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

pub struct TemplateSelector {
    storage: Arc<dyn KeyValueStore>,
    active: TemplateId,
}

impl TemplateSelector {
    /// Reads the stored choice. Missing or unrecognised values mean the default.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let active = match storage.get(TEMPLATE_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|e: UnknownTemplate| {
                warn!("Stored {e}; using {}", TemplateId::default());
                TemplateId::default()
            }),
            None => TemplateId::default(),
        };
        Ok(Self { storage, active })
    }

    pub fn active(&self) -> TemplateId {
        self.active
    }

    /// Persists first, so a failed write leaves the old choice active.
    pub fn select(&mut self, template: TemplateId) -> Result<(), StorageError> {
        self.storage.set(TEMPLATE_KEY, template.as_str())?;
        debug!("Template changed {} -> {}", self.active, template);
        self.active = template;
        Ok(())
    }

    pub fn available() -> &'static [TemplateId] {
        &TemplateId::ALL
    }
}
