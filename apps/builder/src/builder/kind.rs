//! Section type tags, including the pinned header and footer kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type tag of a section.
///
/// The known tags form a closed set, but tags read back from storage or sent
/// by a client are kept as `Other` instead of being rejected: an unrecognised
/// tag still occupies a slot in the ordering and renders as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Header,
    About,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Footer,
    Other(String),
}

impl SectionKind {
    /// Every known kind, in canonical document order.
    pub const KNOWN: [SectionKind; 8] = [
        SectionKind::Header,
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Footer,
    ];

    /// Kinds placed in a fresh session, in order. No footer.
    pub const DEFAULT_SEED: [SectionKind; 7] = [
        SectionKind::Header,
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SectionKind::Header => "header",
            SectionKind::About => "about",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Footer => "footer",
            SectionKind::Other(tag) => tag,
        }
    }

    /// Header and footer are pinned to the ends of the list.
    pub fn is_pinned(&self) -> bool {
        matches!(self, SectionKind::Header | SectionKind::Footer)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SectionKind::Other(_))
    }
}

impl From<String> for SectionKind {
    /// Surrounding whitespace is not part of a tag.
    fn from(tag: String) -> Self {
        match tag.trim() {
            "header" => SectionKind::Header,
            "about" => SectionKind::About,
            "experience" => SectionKind::Experience,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "projects" => SectionKind::Projects,
            "certifications" => SectionKind::Certifications,
            "footer" => SectionKind::Footer,
            other => SectionKind::Other(other.to_string()),
        }
    }
}

impl From<&str> for SectionKind {
    fn from(tag: &str) -> Self {
        SectionKind::from(tag.to_string())
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
