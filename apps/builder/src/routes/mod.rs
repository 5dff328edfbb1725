pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::builder::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sections API
        .route(
            "/api/v1/sections",
            get(handlers::handle_list_sections).post(handlers::handle_add_section),
        )
        .route("/api/v1/sections/drop", post(handlers::handle_drop))
        .route("/api/v1/sections/reset", post(handlers::handle_reset))
        .route("/api/v1/sections/palette", get(handlers::handle_palette))
        .route("/api/v1/sections/:id", delete(handlers::handle_remove_section))
        .route(
            "/api/v1/sections/:id/position",
            patch(handlers::handle_move_section),
        )
        .route(
            "/api/v1/sections/:id/content",
            patch(handlers::handle_update_content),
        )
        .route("/api/v1/registry", get(handlers::handle_registry))
        .route("/api/v1/document", get(handlers::handle_document))
        // Template API
        .route(
            "/api/v1/template",
            get(handlers::handle_get_template).put(handlers::handle_set_template),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::builder::persistence::SECTIONS_KEY;
    use crate::builder::template::TEMPLATE_KEY;
    use crate::builder::Editor;
    use crate::config::Config;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn test_config() -> Config {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            redis_url: None,
            storage_namespace: None,
        }
    }

    fn app_with(storage: Arc<MemoryStore>) -> Router {
        let editor = Editor::open(storage).unwrap();
        build_router(AppState::new(editor, test_config()))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn types(body: &Value) -> Vec<String> {
        body["sections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["type"].as_str().unwrap().to_string())
            .collect()
    }

    fn id_of(body: &Value, kind: &str) -> String {
        body["sections"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["type"] == kind)
            .and_then(|s| s["id"].as_str())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }

    #[tokio::test]
    async fn test_fresh_session_lists_default_seed_with_descriptors() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = call(&app, Method::GET, "/api/v1/sections", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            types(&body),
            vec![
                "header",
                "about",
                "experience",
                "education",
                "skills",
                "projects",
                "certifications"
            ]
        );
        assert_eq!(body["sections"][1]["label"], "About Me");
        assert_eq!(body["sections"][1]["content"], json!({}));
        assert_eq!(body["template"], "classic");
    }

    #[tokio::test]
    async fn test_add_footer_then_duplicate_is_reported_not_failed() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/sections",
            Some(json!({"type": "footer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        assert_eq!(body["section"]["type"], "footer");
        assert_eq!(types(&body).len(), 8);
        assert_eq!(types(&body)[7], "footer");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/sections",
            Some(json!({"type": "footer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
        assert_eq!(body["rejection"], "duplicate_type");
        assert_eq!(types(&body).len(), 8);
    }

    #[tokio::test]
    async fn test_empty_type_is_a_validation_error() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/sections",
            Some(json!({"type": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_move_header_is_rejected() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (_, body) = call(&app, Method::GET, "/api/v1/sections", None).await;
        let header = id_of(&body, "header");

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sections/{header}/position"),
            Some(json!({"index": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rejection"], "pinned_section_move_rejected");
        assert_eq!(types(&body)[0], "header");
    }

    #[tokio::test]
    async fn test_move_remove_and_update_round_trip_through_storage() {
        let storage = Arc::new(MemoryStore::new());
        let app = app_with(storage.clone());
        let (_, body) = call(&app, Method::GET, "/api/v1/sections", None).await;
        let skills = id_of(&body, "skills");
        let about = id_of(&body, "about");

        let (_, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sections/{skills}/position"),
            Some(json!({"index": 1})),
        )
        .await;
        assert_eq!(types(&body)[1], "skills");

        let (_, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sections/{skills}/content"),
            Some(json!({"skills": ["Rust", "SQL"]})),
        )
        .await;
        assert_eq!(body["applied"], true);

        let (_, body) = call(
            &app,
            Method::DELETE,
            &format!("/api/v1/sections/{about}"),
            None,
        )
        .await;
        assert!(!types(&body).contains(&"about".to_string()));

        let (_, document) = call(&app, Method::GET, "/api/v1/document", None).await;
        assert_eq!(
            document["sectionsData"][&skills]["content"],
            json!({"skills": ["Rust", "SQL"]})
        );
        assert!(document["sectionsData"].get(&about).is_none());

        // A second app over the same storage sees the same state.
        let reopened = app_with(storage.clone());
        let (_, again) = call(&reopened, Method::GET, "/api/v1/document", None).await;
        assert_eq!(again, document);
        assert!(storage.get(SECTIONS_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_id_is_a_noop() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = call(&app, Method::DELETE, "/api/v1/sections/ghost", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
        assert_eq!(body["rejection"], "unknown_section_id");
        assert_eq!(types(&body).len(), 7);
    }

    #[tokio::test]
    async fn test_non_object_content_patch_is_rejected() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (_, body) = call(&app, Method::GET, "/api/v1/sections", None).await;
        let about = id_of(&body, "about");
        let (status, _) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sections/{about}/content"),
            Some(json!(["not", "an", "object"])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_palette_drop_lands_between_pins() {
        let app = app_with(Arc::new(MemoryStore::new()));
        call(
            &app,
            Method::POST,
            "/api/v1/sections",
            Some(json!({"type": "footer"})),
        )
        .await;
        let (_, body) = call(&app, Method::GET, "/api/v1/sections", None).await;
        let projects = id_of(&body, "projects");
        call(
            &app,
            Method::DELETE,
            &format!("/api/v1/sections/{projects}"),
            None,
        )
        .await;

        let (_, palette) = call(&app, Method::GET, "/api/v1/sections/palette", None).await;
        assert_eq!(palette.as_array().unwrap().len(), 1);
        assert_eq!(palette[0]["type"], "projects");

        let boxes: Vec<Value> = (0..7)
            .map(|i| json!({"top": i * 100, "height": 100}))
            .collect();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/sections/drop",
            Some(json!({
                "payload": {"source": "palette", "type": "projects"},
                "drop_y": 10_000,
                "boxes": boxes,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        let types = types(&body);
        assert_eq!(types.last().map(String::as_str), Some("footer"));
        assert_eq!(types[0], "header");
        assert!(types.contains(&"projects".to_string()));
    }

    fn palette_drop(tag: &str) -> Value {
        let boxes: Vec<Value> = (0..7)
            .map(|i| json!({"top": i * 100, "height": 100}))
            .collect();
        json!({
            "payload": {"source": "palette", "type": tag},
            "drop_y": 250,
            "boxes": boxes,
        })
    }

    #[tokio::test]
    async fn test_palette_drop_with_blank_type_is_a_validation_error() {
        let storage = Arc::new(MemoryStore::new());
        let app = app_with(storage.clone());
        let (_, before) = call(&app, Method::GET, "/api/v1/sections", None).await;

        for tag in ["", "   "] {
            let (status, body) = call(
                &app,
                Method::POST,
                "/api/v1/sections/drop",
                Some(palette_drop(tag)),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        let (_, after) = call(&app, Method::GET, "/api/v1/sections", None).await;
        assert_eq!(types(&after), types(&before));
    }

    #[tokio::test]
    async fn test_palette_drop_with_padded_type_hits_duplicate_check() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/sections/drop",
            Some(palette_drop(" about ")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
        assert_eq!(body["rejection"], "duplicate_type");
        assert_eq!(types(&body).len(), 7);
        assert_eq!(types(&body).iter().filter(|t| *t == "about").count(), 1);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let app = app_with(Arc::new(MemoryStore::new()));
        call(
            &app,
            Method::POST,
            "/api/v1/sections",
            Some(json!({"type": "footer"})),
        )
        .await;
        let (_, body) = call(&app, Method::POST, "/api/v1/sections/reset", None).await;
        assert_eq!(body["applied"], true);
        assert_eq!(types(&body).len(), 7);
    }

    #[tokio::test]
    async fn test_registry_lists_every_type() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (_, body) = call(&app, Method::GET, "/api/v1/registry", None).await;
        assert_eq!(body.as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_malformed_storage_starts_from_seed() {
        let storage = Arc::new(MemoryStore::with_entries([(SECTIONS_KEY, "{not valid json")]));
        let app = app_with(storage);
        let (_, body) = call(&app, Method::GET, "/api/v1/sections", None).await;
        assert_eq!(types(&body).len(), 7);
    }

    #[tokio::test]
    async fn test_template_switch_persists_and_keeps_order() {
        let storage = Arc::new(MemoryStore::new());
        let app = app_with(storage.clone());
        let (_, before) = call(&app, Method::GET, "/api/v1/document", None).await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/v1/template",
            Some(json!({"template": "modern"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template"], "modern");
        assert_eq!(body["available"].as_array().unwrap().len(), 4);
        assert_eq!(storage.get(TEMPLATE_KEY).unwrap().as_deref(), Some("modern"));

        let (_, after) = call(&app, Method::GET, "/api/v1/document", None).await;
        assert_eq!(before, after);

        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/v1/template",
            Some(json!({"template": "vaporwave"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = call(&app, Method::GET, "/api/v1/template", None).await;
        assert_eq!(body["template"], "modern");
    }
}
