use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // stdout carries the response stream; diagnostics go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    embed_worker::run()
}
