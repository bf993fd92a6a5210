//! Registry of supported embedding models.
//!
//! Maps wire model names to their FastEmbed backing model and native output
//! dimension. Both the short sentence-transformers spelling and the
//! Hugging Face `org/name` spelling are accepted in load commands.

use fastembed::EmbeddingModel;

use super::{EmbedderError, EmbedderResult};

/// Model used when a load command names none.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// A supported embedding model.
#[derive(Debug, Clone)]
pub struct RegisteredModel {
    /// Wire name accepted in load commands.
    pub name: &'static str,
    /// Hugging Face model ID, also accepted.
    pub huggingface_id: &'static str,
    /// Backing FastEmbed model.
    pub model: EmbeddingModel,
    /// Native output dimension.
    pub dimension: usize,
}

static SUPPORTED: &[RegisteredModel] = &[
    RegisteredModel {
        name: "all-MiniLM-L6-v2",
        huggingface_id: "sentence-transformers/all-MiniLM-L6-v2",
        model: EmbeddingModel::AllMiniLML6V2,
        dimension: 384,
    },
    RegisteredModel {
        name: "all-MiniLM-L12-v2",
        huggingface_id: "sentence-transformers/all-MiniLM-L12-v2",
        model: EmbeddingModel::AllMiniLML12V2,
        dimension: 384,
    },
    RegisteredModel {
        name: "bge-small-en-v1.5",
        huggingface_id: "BAAI/bge-small-en-v1.5",
        model: EmbeddingModel::BGESmallENV15,
        dimension: 384,
    },
    RegisteredModel {
        name: "bge-base-en-v1.5",
        huggingface_id: "BAAI/bge-base-en-v1.5",
        model: EmbeddingModel::BGEBaseENV15,
        dimension: 768,
    },
    RegisteredModel {
        name: "nomic-embed-text-v1.5",
        huggingface_id: "nomic-ai/nomic-embed-text-v1.5",
        model: EmbeddingModel::NomicEmbedTextV15,
        dimension: 768,
    },
    RegisteredModel {
        name: "multilingual-e5-small",
        huggingface_id: "intfloat/multilingual-e5-small",
        model: EmbeddingModel::MultilingualE5Small,
        dimension: 384,
    },
];

/// All supported models, default first.
pub fn supported_models() -> &'static [RegisteredModel] {
    SUPPORTED
}

/// Resolve a wire model name to its registry entry.
pub fn resolve(name: &str) -> EmbedderResult<&'static RegisteredModel> {
    SUPPORTED
        .iter()
        .find(|m| m.name == name || m.huggingface_id == name)
        .ok_or_else(|| EmbedderError::UnknownModel(name.to_string()))
}
