// src/config.rs
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub data_store_url: Option<String>,
    pub data_store_key: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            data_store_url: None,
            data_store_key: None,
        }
    }
}

impl RelayConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse_var("BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            api_key: non_empty_var("GROQ_API_KEY"),
            upstream_url: non_empty_var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            model: non_empty_var("UPSTREAM_MODEL").unwrap_or(defaults.model),
            temperature: parse_var("UPSTREAM_TEMPERATURE")?.unwrap_or(defaults.temperature),
            max_tokens: parse_var("UPSTREAM_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            data_store_url: non_empty_var("SUPABASE_URL"),
            data_store_key: non_empty_var("SUPABASE_SERVICE_ROLE_KEY"),
        })
    }
}

/// Settings for the terminal chat client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/chat".to_string(),
            token: None,
            idle_timeout: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            endpoint: non_empty_var("CHAT_URL").unwrap_or(defaults.endpoint),
            token: non_empty_var("CHAT_TOKEN"),
            idle_timeout: parse_var::<u64>("CHAT_IDLE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("invalid value for {key}: {raw}")))
        .transpose()
}
