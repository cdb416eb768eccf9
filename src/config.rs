use std::time::Duration;

use crate::{deck::DEFAULT_SLIDE_DELAY, gateway::RetryPolicy, gemini::DEMO_KEY};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub retry: RetryPolicy,
    pub slide_delay: Duration,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEMO_KEY.to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            retry: RetryPolicy::default(),
            slide_delay: DEFAULT_SLIDE_DELAY,
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; missing or unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let string = |key: &str, default: String| lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or(default);
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            api_key: string("GEMINI_API_KEY", defaults.api_key),
            api_base: string("GEMINI_API_BASE", defaults.api_base),
            image_model: string("GEMINI_IMAGE_MODEL", defaults.image_model),
            text_model: string("GEMINI_TEXT_MODEL", defaults.text_model),
            retry: RetryPolicy {
                retries: number("GEMINI_RETRIES").and_then(|n| u32::try_from(n).ok()).unwrap_or(defaults.retry.retries),
                initial_delay: number("GEMINI_RETRY_DELAY_MS").map(Duration::from_millis).unwrap_or(defaults.retry.initial_delay),
                ..defaults.retry
            },
            slide_delay: number("DECK_SLIDE_DELAY_MS").map(Duration::from_millis).unwrap_or(defaults.slide_delay),
            port: number("PORT").and_then(|n| u16::try_from(n).ok()).unwrap_or(defaults.port),
        }
    }

    pub fn is_demo(&self) -> bool { self.api_key == DEMO_KEY }
}
