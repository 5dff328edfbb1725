//! Axum route handlers for the Sections and Template APIs.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::drop_position::{DropEvent, DropPayload};
use crate::builder::errors::{Rejection, SectionError};
use crate::builder::kind::SectionKind;
use crate::builder::registry::{self, SectionDescriptor};
use crate::builder::section::{Content, Section, SectionId};
use crate::builder::store::{DocumentSnapshot, SectionStore};
use crate::builder::template::{TemplateId, TemplateSelector};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub index: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct MoveSectionRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: String,
}

/// A placed section with its registry descriptor and content, in list order.
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    #[serde(flatten)]
    pub descriptor: SectionDescriptor,
    pub content: Content,
}

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub sections: Vec<SectionView>,
    pub template: TemplateId,
}

/// Result of any section mutation. A rejected operation is a no-op and is
/// reported with `applied: false` and a `rejection` code.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: TemplateId,
    pub available: &'static [TemplateId],
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Folds an operation result into a response, turning rejections into no-ops.
fn settle(
    store: &SectionStore,
    result: Result<Option<Section>, SectionError>,
) -> Result<MutationResponse, AppError> {
    let (applied, rejection, section) = match result {
        Ok(section) => (true, None, section),
        Err(e) => match e.rejection() {
            Some(code) => {
                tracing::debug!("Section operation rejected: {e}");
                (false, Some(code), None)
            }
            None => return Err(e.into()),
        },
    };
    Ok(MutationResponse {
        applied,
        rejection,
        section,
        sections: store.sections().to_vec(),
    })
}

fn section_views(store: &SectionStore) -> Vec<SectionView> {
    store
        .sections()
        .iter()
        .map(|s| SectionView {
            id: s.id.clone(),
            descriptor: registry::describe(&s.kind),
            content: store.content(&s.id).cloned().unwrap_or_default(),
        })
        .collect()
}

fn parse_kind(tag: &str) -> Result<SectionKind, AppError> {
    let kind = SectionKind::from(tag);
    validate_kind(&kind)?;
    Ok(kind)
}

fn validate_kind(kind: &SectionKind) -> Result<(), AppError> {
    if kind.as_str().is_empty() {
        return Err(AppError::Validation("type cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sections
pub async fn handle_list_sections(
    State(state): State<AppState>,
) -> Result<Json<SectionsResponse>, AppError> {
    let response = state
        .with_editor(|editor| {
            Ok(SectionsResponse {
                sections: section_views(&editor.sections),
                template: editor.templates.active(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    Json(request): Json<AddSectionRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let kind = parse_kind(&request.kind)?;
    let response = state
        .with_editor(move |editor| {
            let result = editor.sections.add_section(kind, request.index).map(Some);
            settle(&editor.sections, result)
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/sections/:id
pub async fn handle_remove_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = SectionId::from(id);
    let response = state
        .with_editor(move |editor| {
            let result = editor.sections.remove_section(&id).map(Some);
            settle(&editor.sections, result)
        })
        .await?;
    Ok(Json(response))
}

/// PATCH /api/v1/sections/:id/position
pub async fn handle_move_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveSectionRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = SectionId::from(id);
    let response = state
        .with_editor(move |editor| {
            let result = editor
                .sections
                .move_section(&id, request.index)
                .map(|()| None);
            settle(&editor.sections, result)
        })
        .await?;
    Ok(Json(response))
}

/// PATCH /api/v1/sections/:id/content
///
/// Body is a JSON object; its top-level keys overwrite the stored ones.
pub async fn handle_update_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let Value::Object(patch) = patch else {
        return Err(AppError::Validation(
            "content patch must be a JSON object".to_string(),
        ));
    };
    let id = SectionId::from(id);
    let response = state
        .with_editor(move |editor| {
            let result = editor
                .sections
                .update_section_content(&id, patch)
                .map(|()| None);
            settle(&editor.sections, result)
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sections/drop
///
/// Resolves the drop position, then moves or adds. An abandoned drag never
/// reaches this endpoint, so it cannot leave a partial insertion behind.
pub async fn handle_drop(
    State(state): State<AppState>,
    Json(event): Json<DropEvent>,
) -> Result<Json<MutationResponse>, AppError> {
    if !event.drop_y.is_finite() {
        return Err(AppError::Validation(
            "drop_y must be a finite number".to_string(),
        ));
    }
    if let DropPayload::Palette { kind } = &event.payload {
        validate_kind(kind)?;
    }
    let response = state
        .with_editor(move |editor| {
            let result = editor.sections.apply_drop(&event);
            settle(&editor.sections, result)
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sections/reset
pub async fn handle_reset(
    State(state): State<AppState>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = state
        .with_editor(|editor| {
            let result = editor.sections.reset().map(|()| None);
            settle(&editor.sections, result)
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/sections/palette
///
/// Known section types that can still be added.
pub async fn handle_palette(
    State(state): State<AppState>,
) -> Result<Json<Vec<SectionDescriptor>>, AppError> {
    let palette = state
        .with_editor(|editor| {
            Ok(editor
                .sections
                .available_kinds()
                .iter()
                .map(registry::describe)
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(palette))
}

/// GET /api/v1/registry
pub async fn handle_registry() -> Json<Vec<SectionDescriptor>> {
    Json(registry::all())
}

/// GET /api/v1/document
///
/// The list and content map as one consistent snapshot, for document
/// generation.
pub async fn handle_document(
    State(state): State<AppState>,
) -> Result<Json<DocumentSnapshot>, AppError> {
    let snapshot = state
        .with_editor(|editor| Ok(editor.sections.snapshot()))
        .await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/template
pub async fn handle_get_template(
    State(state): State<AppState>,
) -> Result<Json<TemplateResponse>, AppError> {
    let template = state
        .with_editor(|editor| Ok(editor.templates.active()))
        .await?;
    Ok(Json(TemplateResponse {
        template,
        available: TemplateSelector::available(),
    }))
}

/// PUT /api/v1/template
pub async fn handle_set_template(
    State(state): State<AppState>,
    Json(request): Json<TemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    let template: TemplateId = request
        .template
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    let template = state
        .with_editor(move |editor| {
            editor.templates.select(template)?;
            Ok(editor.templates.active())
        })
        .await?;
    Ok(Json(TemplateResponse {
        template,
        available: TemplateSelector::available(),
    }))
}
