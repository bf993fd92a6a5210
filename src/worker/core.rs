//! Worker loop: the request/response lifecycle against the message channel.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::cache::ModelCache;
use super::channel::{Channel, RecvError};
use super::dispatch::CommandDispatcher;
use super::protocol::{ACTION_EXIT, ParsedFrame, Response, parse_frame};
use crate::config::WorkerConfig;
use crate::embedder::ModelLoader;

/// The worker: pulls commands, dispatches them, pushes responses.
///
/// Strictly sequential: one command is fully processed and answered before
/// the next is read. Per-command failures never terminate the loop; only an
/// explicit exit command or channel closure does.
pub struct Worker<C: Channel> {
    config: WorkerConfig,
    channel: C,
    dispatcher: CommandDispatcher,
}

impl<C: Channel> Worker<C> {
    pub fn new(config: WorkerConfig, channel: C, loader: Box<dyn ModelLoader>) -> Self {
        let cache = ModelCache::new(loader, config.default_model.clone());
        Self {
            config,
            channel,
            dispatcher: CommandDispatcher::new(cache),
        }
    }

    /// Eagerly load the default model, announce readiness, then serve until
    /// an exit command or channel closure.
    pub fn run(mut self) -> Result<()> {
        let status = self
            .dispatcher
            .cache_mut()
            .load(None)
            .context("failed to load default model")?;
        info!(model = %status.model, dimension = status.dimension, "worker ready");
        self.send(&Response::ready(status.model))
            .context("failed to announce readiness")?;

        loop {
            let frame = match self.channel.receive(self.config.poll_timeout) {
                Ok(frame) => frame,
                Err(RecvError::TimedOut) => continue,
                Err(RecvError::Closed) => {
                    info!("channel closed, shutting down");
                    break;
                }
                Err(RecvError::Malformed(err)) => {
                    warn!(error = %err, "dropping malformed frame");
                    continue;
                }
            };

            match parse_frame(frame) {
                ParsedFrame::Ignored => continue,
                ParsedFrame::Invalid(reason) => {
                    if self.respond(Response::error(reason)).is_err() {
                        break;
                    }
                }
                ParsedFrame::Command(command) => {
                    let exit = command.action == ACTION_EXIT;
                    let response = self.dispatcher.dispatch(&command);
                    if self.respond(response).is_err() {
                        break;
                    }
                    if exit {
                        info!("exit command received, shutting down");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn send(&self, response: &Response) -> Result<()> {
        let value = serde_json::to_value(response).context("failed to encode response")?;
        self.channel
            .send(&value)
            .context("failed to write response")?;
        Ok(())
    }

    /// In-loop send; a failure means the peer is gone, so the caller shuts
    /// the loop down the same way it does on inbound closure.
    fn respond(&self, response: Response) -> Result<()> {
        self.send(&response).inspect_err(|err| {
            warn!(error = %err, "peer went away, shutting down");
        })
    }
}
