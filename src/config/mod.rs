/// Application configuration module
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Already-retrieved launches payload to decode
    pub payload_path: PathBuf,
    /// Skip launches that fail to decode instead of aborting
    pub skip_invalid: bool,
    pub upcoming_only: bool,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let payload_path = env::var("LAUNCHES_PAYLOAD_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("launches.json"));

        Ok(Self {
            payload_path,
            skip_invalid: env_bool("SKIP_INVALID_LAUNCHES", false),
            upcoming_only: env_bool("UPCOMING_ONLY", false),
        })
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|s| parse_bool(&s))
        .unwrap_or(default)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
