pub mod domain;
pub mod llm;
pub mod service;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub groq_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub generation_timeout_secs: Option<u64>,
    }

    /// Reads a whole-seconds duration knob. Unset means "use the default";
    /// a set but malformed value is a startup error.
    pub fn env_secs(name: &str) -> anyhow::Result<Option<u64>> {
        match std::env::var(name) {
            Ok(raw) => parse_secs(name, &raw).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn parse_secs(name: &str, raw: &str) -> anyhow::Result<u64> {
        raw.trim()
            .parse::<u64>()
            .with_context(|| format!("{name} must be a whole number of seconds (got {raw:?})"))
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let generation_timeout_secs = env_secs("FORTUNE_TIMEOUT_SECS")?;

            Ok(Self {
                groq_api_key: std::env::var("GROQ_API_KEY")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                generation_timeout_secs,
            })
        }

        pub fn require_groq_api_key(&self) -> anyhow::Result<&str> {
            self.groq_api_key
                .as_deref()
                .context("GROQ_API_KEY is required")
        }

        pub fn generation_timeout(&self) -> Duration {
            Duration::from_secs(
                self.generation_timeout_secs
                    .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
            )
        }
    }

}
