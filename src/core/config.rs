use std::env;
use std::time::Duration;

use tracing::warn;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_hostname: String,
    pub api_key: String,
    pub assistant_id: String,
    pub storage_path: String,
    pub credentials_path: String,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    parse_or_default(key, env::var(key).ok(), default)
}

/// A value that is set but unparseable falls back to the default with
/// a warning rather than silently, so a typo does not masquerade as
/// the default.
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    match raw {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid {} value {:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_hostname = env::var("TONY_API_HOSTNAME")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let api_key = env::var("OPENAI_API_KEY").expect("Missing env var OPENAI_API_KEY");
        let assistant_id = env::var("ASSISTANT_ID").expect("Missing env var ASSISTANT_ID");
        let storage_path = env::var("TONY_STORAGE_PATH").unwrap_or("./".to_string());
        let credentials_path =
            env::var("TONY_CREDENTIALS_PATH").unwrap_or("credentials.json".to_string());
        let poll_interval_ms = env_parse("TONY_POLL_INTERVAL_MS", 1000u64);
        let poll_max_attempts = env_parse("TONY_POLL_MAX_ATTEMPTS", 300u32);

        Self {
            api_hostname,
            api_key,
            assistant_id,
            storage_path,
            credentials_path,
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_max_attempts,
        }
    }
}
