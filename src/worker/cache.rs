//! Model lifecycle cache.
//!
//! Owns zero-or-one loaded embedding model. Loads are lazy and idempotent:
//! requesting the active model's name again is a no-op, switching names
//! replaces the handle, and a failed load leaves the previous handle active.

use tracing::info;

use crate::embedder::{Embedder, EmbedderResult, ModelLoader};

/// Result of a (possibly idempotent) load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadStatus {
    pub model: String,
    pub dimension: usize,
}

/// Snapshot of the cache state.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheInfo {
    pub model: Option<String>,
    pub dimension: Option<usize>,
    pub ready: bool,
}

/// The single active model: its wire name plus the live handle.
pub struct ActiveModel {
    name: String,
    handle: Box<dyn Embedder>,
}

impl ActiveModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reported from the live handle, never cached separately.
    pub fn dimension(&self) -> usize {
        self.handle.dimension()
    }

    pub fn encode(&mut self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>> {
        self.handle.encode(texts)
    }
}

/// Lazily materializes and caches exactly one embedder handle.
pub struct ModelCache {
    loader: Box<dyn ModelLoader>,
    default_model: String,
    active: Option<ActiveModel>,
}

impl ModelCache {
    pub fn new(loader: Box<dyn ModelLoader>, default_model: impl Into<String>) -> Self {
        Self {
            loader,
            default_model: default_model.into(),
            active: None,
        }
    }

    /// Name used when a load names no model.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Load `name` (or the default), replacing the active handle only when
    /// the name differs. On failure the previous handle stays active.
    pub fn load(&mut self, name: Option<&str>) -> EmbedderResult<LoadStatus> {
        let name = name.unwrap_or(&self.default_model).to_string();

        if let Some(active) = self.active.as_ref()
            && active.name == name
        {
            return Ok(LoadStatus {
                model: name,
                dimension: active.dimension(),
            });
        }

        let active = self.install(name)?;
        Ok(LoadStatus {
            model: active.name.clone(),
            dimension: active.dimension(),
        })
    }

    /// Current handle, loading the default model first if none is cached.
    pub fn ensure_loaded(&mut self) -> EmbedderResult<&mut ActiveModel> {
        if self.active.is_none() {
            let name = self.default_model.clone();
            self.install(name)?;
        }
        // install() either errored out above or left a handle in place.
        Ok(self.active.as_mut().expect("active model present"))
    }

    /// Pure read of the cache state; never triggers a load.
    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            model: self.active.as_ref().map(|a| a.name.clone()),
            dimension: self.active.as_ref().map(ActiveModel::dimension),
            ready: self.active.is_some(),
        }
    }

    fn install(&mut self, name: String) -> EmbedderResult<&mut ActiveModel> {
        let handle = self.loader.load(&name)?;
        let active = self.active.insert(ActiveModel { name, handle });
        info!(model = %active.name, dimension = active.dimension(), "model installed");
        Ok(active)
    }
}
