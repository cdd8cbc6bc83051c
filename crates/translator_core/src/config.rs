//! Environment-driven configuration.
//!
//! Shaped like the `Global` clap-args struct (one struct, one place that
//! reads the environment) without the CLI-framework dependency —
//! `translator_core` stays framework-agnostic, `clap` lives in the
//! `translator` binary only.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the chat-completion endpoint. Absent means the
    /// orchestrator always falls through to the fallback builder.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_timeout: Duration,

    pub database_url: Option<String>,

    /// Log every translation regardless of confidence, overriding the
    /// default "only log interesting ones" selection.
    pub log_all_translations: bool,
    /// Run the built-in self-test battery at startup.
    pub run_query_validation_checks: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            llm_api_key: env::var("LOVABLE_API_KEY").ok(),
            llm_base_url: env::var("LOVABLE_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.lovable.dev".to_string()),
            llm_timeout: Duration::from_secs(15),
            database_url: env::var("SUPABASE_URL").ok(),
            log_all_translations: env_flag("LOG_ALL_TRANSLATIONS"),
            run_query_validation_checks: env_flag("RUN_QUERY_VALIDATION_CHECKS"),
        }
    }

    pub fn has_llm_key(&self) -> bool {
        self.llm_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_fifteen_seconds() {
        let config = Config {
            llm_api_key: None,
            llm_base_url: "https://example.invalid".into(),
            llm_timeout: Duration::from_secs(15),
            database_url: None,
            log_all_translations: false,
            run_query_validation_checks: false,
        };
        assert_eq!(config.llm_timeout, Duration::from_secs(15));
        assert!(!config.has_llm_key());
    }
}
