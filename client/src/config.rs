use std::env;
use std::time::Duration;

pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_ASK_TIMEOUT: Duration = Duration::from_secs(60);
pub const MIN_ASK_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_ASK_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the backend lives and how long each endpoint may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub process_timeout: Duration,
    pub ask_timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            ask_timeout: DEFAULT_ASK_TIMEOUT,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// How questions are reflected in the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AskPolicy {
    /// Append the user turn before the backend call instead of after the answer.
    pub eager_question: bool,
    /// Keep failed questions in the transcript with the error as the assistant turn.
    pub record_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub policy: AskPolicy,
}

impl ClientConfig {
    /// Reads the client configuration from the process environment.
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("BACKEND_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow::anyhow!("BACKEND_URL environment variable not set"))?;

        let mut backend = BackendConfig::new(&base_url);

        if let Some(secs) = parse_var::<u64, _>(&lookup, "PDF_CHAT_PROCESS_TIMEOUT_SECS")? {
            backend.process_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "PDF_CHAT_ASK_TIMEOUT_SECS")? {
            let requested = Duration::from_secs(secs);
            let clamped = requested.clamp(MIN_ASK_TIMEOUT, MAX_ASK_TIMEOUT);
            if clamped != requested {
                log::warn!(
                    "Ask timeout of {}s is outside {}-{}s, using {}s",
                    secs,
                    MIN_ASK_TIMEOUT.as_secs(),
                    MAX_ASK_TIMEOUT.as_secs(),
                    clamped.as_secs()
                );
            }
            backend.ask_timeout = clamped;
        }

        let policy = AskPolicy {
            eager_question: parse_var(&lookup, "PDF_CHAT_EAGER_QUESTION")?.unwrap_or(false),
            record_errors: parse_var(&lookup, "PDF_CHAT_RECORD_ERRORS")?.unwrap_or(false),
        };

        Ok(Self { backend, policy })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value {:?} for {}: {}", raw, key, e)),
    }
}
