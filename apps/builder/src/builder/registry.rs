//! Section registry: presentation descriptors keyed by section type.
//!
//! Pure lookup table. Unknown tags resolve to a marked placeholder rather than
//! failing, so a display gap never touches the ordering model.

use serde::Serialize;

use crate::builder::kind::SectionKind;

/// What a renderer needs to draw a section's chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDescriptor {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub default_color: &'static str,
    /// False for the placeholder returned for unrecognised tags.
    pub known: bool,
}

const UNKNOWN_LABEL: &str = "Unknown Section";
const UNKNOWN_ICON: &str = "help-circle";
const UNKNOWN_COLOR: &str = "#9ca3af";

/// Looks up the descriptor for `kind`.
pub fn describe(kind: &SectionKind) -> SectionDescriptor {
    let (label, icon, default_color) = match kind {
        SectionKind::Header => ("Header", "user", "#1f2937"),
        SectionKind::About => ("About Me", "file-text", "#2563eb"),
        SectionKind::Experience => ("Experience", "briefcase", "#7c3aed"),
        SectionKind::Education => ("Education", "graduation-cap", "#059669"),
        SectionKind::Skills => ("Skills", "wrench", "#d97706"),
        SectionKind::Projects => ("Projects", "folder-git", "#db2777"),
        SectionKind::Certifications => ("Certifications", "award", "#0891b2"),
        SectionKind::Footer => ("Footer", "panel-bottom", "#4b5563"),
        SectionKind::Other(_) => (UNKNOWN_LABEL, UNKNOWN_ICON, UNKNOWN_COLOR),
    };
    SectionDescriptor {
        kind: kind.clone(),
        label,
        icon,
        default_color,
        known: kind.is_known(),
    }
}

/// Descriptors for every known kind, in canonical order.
pub fn all() -> Vec<SectionDescriptor> {
    SectionKind::KNOWN.iter().map(describe).collect()
}
