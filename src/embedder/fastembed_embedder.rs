//! FastEmbed-backed embedder (ONNX Runtime).
//!
//! Weights are fetched into the FastEmbed cache directory on first
//! construction and reused afterwards, so construction dominates the cost of
//! any single encode call.

use fastembed::{InitOptions, TextEmbedding};
use tracing::{debug, info};

use super::registry;
use super::{Embedder, EmbedderError, EmbedderResult, ModelLoader};

/// A loaded FastEmbed model handle.
pub struct FastEmbedder {
    name: String,
    dimension: usize,
    model: TextEmbedding,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl FastEmbedder {
    /// Construct a handle for a registered model name.
    ///
    /// Unknown names are rejected before anything is fetched.
    pub fn load(name: &str) -> EmbedderResult<Self> {
        let entry = registry::resolve(name)?;
        info!(model = %entry.name, dimension = entry.dimension, "loading embedding model");
        let model = TextEmbedding::try_new(
            InitOptions::new(entry.model.clone()).with_show_download_progress(false),
        )
        .map_err(|e| EmbedderError::LoadFailed(e.to_string()))?;
        Ok(Self {
            name: entry.name.to_string(),
            dimension: entry.dimension,
            model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Embedder for FastEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&mut self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(model = %self.name, batch_size = texts.len(), "encoding batch");
        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbedderError::InferenceFailed(e.to_string()))
    }
}

/// [`ModelLoader`] backed by FastEmbed.
pub struct FastEmbedLoader;

impl ModelLoader for FastEmbedLoader {
    fn load(&self, name: &str) -> EmbedderResult<Box<dyn Embedder>> {
        Ok(Box::new(FastEmbedder::load(name)?))
    }
}
