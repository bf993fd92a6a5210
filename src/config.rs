//! Worker configuration.
//!
//! Defaults first, then environment overrides (`EMBED_WORKER_*`), then CLI
//! flags applied by the caller. Environment values are read through `dotenvy`
//! so a local `.env` file works in development.

use std::time::Duration;

use crate::embedder::registry::DEFAULT_MODEL;

/// Configuration for the worker process.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Model loaded at startup and used when a load command names none.
    pub default_model: String,
    /// Bound applied to each inbound receive; expiry is a routine re-poll,
    /// not an error.
    pub poll_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            poll_timeout: Duration::from_secs(1),
        }
    }
}

impl WorkerConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(name) = dotenvy::var("EMBED_WORKER_MODEL")
            && !name.is_empty()
        {
            cfg.default_model = name;
        }

        if let Ok(val) = dotenvy::var("EMBED_WORKER_POLL_TIMEOUT_MS")
            && let Ok(ms) = val.parse()
        {
            cfg.poll_timeout = Duration::from_millis(ms);
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = dotenvy::var(key).ok();
            // SAFETY: test helper toggles a process-local env var for isolation.
            unsafe {
                std::env::set_var(key, value);
            }
            EnvGuard { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                // SAFETY: test helper restores prior process env for isolation.
                unsafe {
                    std::env::set_var(self.key, value);
                }
            } else {
                // SAFETY: test helper restores prior process env for isolation.
                unsafe {
                    std::env::remove_var(self.key);
                }
            }
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = WorkerConfig::default();
        assert_eq!(cfg.default_model, DEFAULT_MODEL);
        assert_eq!(cfg.poll_timeout, Duration::from_secs(1));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let _model = EnvGuard::set("EMBED_WORKER_MODEL", "bge-small-en-v1.5");
        let _poll = EnvGuard::set("EMBED_WORKER_POLL_TIMEOUT_MS", "250");

        let cfg = WorkerConfig::from_env();
        assert_eq!(cfg.default_model, "bge-small-en-v1.5");
        assert_eq!(cfg.poll_timeout, Duration::from_millis(250));
    }

    #[test]
    #[serial]
    fn test_unparseable_timeout_keeps_default() {
        let _poll = EnvGuard::set("EMBED_WORKER_POLL_TIMEOUT_MS", "not-a-number");

        let cfg = WorkerConfig::from_env();
        assert_eq!(cfg.poll_timeout, Duration::from_secs(1));
    }
}
