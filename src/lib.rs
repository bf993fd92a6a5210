pub mod config;
pub mod embedder;
pub mod worker;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use config::WorkerConfig;
use embedder::fastembed_embedder::FastEmbedLoader;
use worker::channel::StdioChannel;
use worker::core::Worker;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "embed-worker",
    version,
    about = "Persistent text-embedding worker speaking JSON lines over stdio"
)]
pub struct Cli {
    /// Model to load at startup (defaults to all-MiniLM-L6-v2)
    #[arg(long)]
    pub model: Option<String>,

    /// Inbound poll timeout in milliseconds
    #[arg(long)]
    pub poll_timeout_ms: Option<u64>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WorkerConfig::from_env();
    if let Some(model) = cli.model {
        config.default_model = model;
    }
    if let Some(ms) = cli.poll_timeout_ms {
        config.poll_timeout = Duration::from_millis(ms);
    }

    let channel = StdioChannel::spawn().context("failed to start stdio transport")?;
    Worker::new(config, channel, Box::new(FastEmbedLoader)).run()
}
