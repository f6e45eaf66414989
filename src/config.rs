use std::{env, time::Duration};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn resolve_api_url() -> String {
    env::var("BOARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// How long each flow keeps its status message on screen.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub removal_message_ttl: Duration,
    pub signup_message_ttl: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            removal_message_ttl: Duration::from_secs(4),
            signup_message_ttl: Duration::from_secs(5),
        }
    }
}
