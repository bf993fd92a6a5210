//! Command dispatch: pure routing from normalized commands to operations.
//!
//! Every failure is folded into a response payload here or in the loop; a
//! bad command never unwinds past the dispatcher.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::cache::ModelCache;
use super::protocol::{
    ACTION_EMBED, ACTION_EXIT, ACTION_HEALTH, ACTION_INFO, ACTION_LOAD, Command, Response,
};
use crate::embedder::{EmbedderError, EmbedderResult};

/// Probe text encoded by the health action.
const HEALTH_PROBE: &str = "health check";

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Embedder(#[from] EmbedderError),
    #[error("texts must be a string or a list of strings")]
    InvalidTexts,
}

/// Routes commands to [`ModelCache`] operations and shapes the responses.
pub struct CommandDispatcher {
    cache: ModelCache,
}

impl CommandDispatcher {
    pub fn new(cache: ModelCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ModelCache {
        &mut self.cache
    }

    /// Dispatch one command, producing exactly one response.
    pub fn dispatch(&mut self, command: &Command) -> Response {
        match command.action.as_str() {
            ACTION_LOAD => self.handle_load(command),
            ACTION_EMBED => self.handle_embed(command),
            ACTION_INFO => self.handle_info(),
            ACTION_HEALTH => self.handle_health(),
            ACTION_EXIT => Response::exiting(),
            other => Response::unknown_action(other),
        }
    }

    fn handle_load(&mut self, command: &Command) -> Response {
        let name = command.data.get("model").and_then(Value::as_str);
        match self.cache.load(name) {
            Ok(status) => Response::loaded(status.model, status.dimension),
            Err(err) => Response::error(err.to_string()),
        }
    }

    fn handle_embed(&mut self, command: &Command) -> Response {
        match self.embed(command) {
            Ok(response) => response,
            Err(err) => Response::error(err.to_string()),
        }
    }

    fn embed(&mut self, command: &Command) -> Result<Response, DispatchError> {
        let texts = extract_texts(command)?;
        let active = self.cache.ensure_loaded()?;
        let embeddings = active.encode(&texts)?;
        let dimension = embeddings.first().map_or(0, Vec::len);
        debug!(batch_size = texts.len(), dimension, "embedded batch");
        Ok(Response::Embeddings {
            embeddings,
            model: active.name().to_string(),
            dimension,
        })
    }

    fn handle_info(&self) -> Response {
        let info = self.cache.info();
        Response::Info {
            model: info.model,
            dimension: info.dimension,
            ready: info.ready,
        }
    }

    fn handle_health(&mut self) -> Response {
        match self.probe() {
            Ok(()) => Response::health_ok(),
            Err(err) => Response::health_error(err.to_string()),
        }
    }

    fn probe(&mut self) -> EmbedderResult<()> {
        let active = self.cache.ensure_loaded()?;
        active.encode(&[HEALTH_PROBE.to_string()])?;
        Ok(())
    }
}

/// Pull the `texts` payload: a bare string becomes a one-element list, a
/// missing key an empty list.
fn extract_texts(command: &Command) -> Result<Vec<String>, DispatchError> {
    match command.data.get("texts") {
        None => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(vec![text.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(DispatchError::InvalidTexts)
            })
            .collect(),
        Some(_) => Err(DispatchError::InvalidTexts),
    }
}
