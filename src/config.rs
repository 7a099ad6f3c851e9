//! Router configuration
//!
//! Loaded once at process start from the environment (binaries call
//! `dotenv` first so a `.env` file works too). Never mutated afterwards.

use std::env;

use crate::classifier::DEFAULT_FINANCIAL_KEYWORDS;
use crate::error::RouterError;
use crate::Result;

const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_GROQ_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PORT: u16 = 8080;

/// How categories map to agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// One agent per category
    Single,
    /// Every query goes to a team of all agents
    Team,
}

#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub groq: GroqConfig,
    pub financial_keywords: Vec<String>,
    pub mode: RoutingMode,
    pub port: u16,
}

impl RouterConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs = match get("GROQ_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                RouterError::ConfigError(format!("GROQ_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_GROQ_TIMEOUT_SECS,
        };

        let financial_keywords = match get("ROUTER_FINANCIAL_KEYWORDS") {
            Some(raw) => raw
                .split(',')
                .map(|kw| kw.trim().to_string())
                .filter(|kw| !kw.is_empty())
                .collect(),
            None => DEFAULT_FINANCIAL_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
        };

        let mode = match get("ROUTER_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("single") => RoutingMode::Single,
            Some("team") => RoutingMode::Team,
            Some(other) => {
                return Err(RouterError::ConfigError(format!(
                    "ROUTER_MODE must be 'single' or 'team', got '{}'",
                    other
                )))
            }
        };

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|_| RouterError::ConfigError(format!("Invalid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            groq: GroqConfig {
                api_key: get("GROQ_API_KEY"),
                model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
                base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
                timeout_secs,
            },
            financial_keywords,
            mode,
            port,
        })
    }
}
