use std::sync::{Arc, Mutex};

use crate::builder::Editor;
use crate::config::Config;
use crate::errors::AppError;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single editing session. Locked for the duration of each operation,
    /// which serializes mutations the way a UI event loop would.
    pub editor: Arc<Mutex<Editor>>,
    pub config: Config,
}

impl AppState {
    pub fn new(editor: Editor, config: Config) -> Self {
        Self {
            editor: Arc::new(Mutex::new(editor)),
            config,
        }
    }

    /// Runs `op` against the editor on the blocking pool. Storage I/O is
    /// synchronous and must not stall the async workers.
    pub async fn with_editor<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Editor) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let editor = self.editor.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = editor
                .lock()
                .map_err(|_| AppError::Internal(anyhow::anyhow!("editor lock poisoned")))?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("editor task failed: {e}")))?
    }
}
