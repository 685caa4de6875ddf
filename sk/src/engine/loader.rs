//! Model load lifecycle
//!
//! A loader is idle until the first `load()` call, then holds the backend
//! handle for the rest of its life. There is no unload. The expensive
//! backend load runs exactly once even when several callers race the first
//! call; a failed load leaves the loader idle so callers can retry.

use std::sync::{Arc, RwLock};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::backend::{BackendError, ModelBackend};

/// Single-init cache around a model backend
pub struct ModelLoader<B: ModelBackend> {
    backend: B,
    handle: OnceCell<Arc<B::Handle>>,
    model_info: RwLock<String>,
}

impl<B: ModelBackend> ModelLoader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handle: OnceCell::new(),
            model_info: RwLock::new(String::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the model, or return the cached handle immediately
    ///
    /// Concurrent first calls all await the same backend load. On failure
    /// the cell stays empty and the error goes to the caller; a later call
    /// starts a fresh load attempt.
    pub async fn load(&self) -> Result<Arc<B::Handle>, BackendError> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let model = self.backend.model_id().to_string();
                info!(%model, "loading model");

                let on_progress = |fraction: f32| {
                    let percent = (fraction * 100.0) as u32;
                    self.set_model_info(format!("Downloading {model}: {percent}%"));
                };

                let handle = self.backend.load(&on_progress).await?;
                self.set_model_info(format!("Loaded {model}"));
                debug!(%model, "ModelLoader::load: backend load complete");
                Ok(Arc::new(handle))
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    /// Whether the backend handle is cached
    pub fn is_loaded(&self) -> bool {
        self.handle.initialized()
    }

    /// The cached handle, if the model has been loaded
    pub fn handle(&self) -> Option<Arc<B::Handle>> {
        self.handle.get().map(Arc::clone)
    }

    /// Human-readable load status for display
    pub fn model_info(&self) -> String {
        self.model_info.read().map(|info| info.clone()).unwrap_or_default()
    }

    fn set_model_info(&self, info: String) {
        if let Ok(mut guard) = self.model_info.write() {
            *guard = info;
        }
    }
}
