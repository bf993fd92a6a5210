//! Embedding-model collaborator layer.
//!
//! This module isolates everything model-shaped behind two seams:
//!
//! - **[`Embedder`]**: a loaded model handle that turns text batches into
//!   fixed-length vectors.
//! - **[`ModelLoader`]**: the construction seam; the worker's cache goes
//!   through it so tests can substitute stub models.
//! - **[`registry`]**: the table of supported model names and their native
//!   dimensions.
//! - **[`fastembed_embedder`]**: the FastEmbed/ONNX-backed implementation.

pub mod fastembed_embedder;
pub mod registry;

use thiserror::Error;

/// Error type for embedding operations.
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// Requested model name is not in the registry.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// Model construction failed (weights fetch, ONNX session, tokenizer).
    #[error("model load failed: {0}")]
    LoadFailed(String),

    /// Encoding failed after the model was constructed.
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

/// Result type for embedding operations.
pub type EmbedderResult<T> = Result<T, EmbedderError>;

/// A loaded embedding model handle.
///
/// Construction cost is assumed high and encode cost comparatively low;
/// callers keep one handle alive across many encode calls.
pub trait Embedder: Send {
    /// Fixed length of every vector this handle produces.
    fn dimension(&self) -> usize;

    /// Encode a batch. Output length equals input length, order preserved.
    fn encode(&mut self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>>;
}

/// Construction seam for embedder handles.
pub trait ModelLoader: Send {
    /// Construct a handle for `name`, or fail without side effects.
    fn load(&self, name: &str) -> EmbedderResult<Box<dyn Embedder>>;
}
