//! Error taxonomy for the translation pipeline.
//!
//! Variants: `input_invalid`, `auth_failed`, `rate_limited`,
//! `ai_unavailable`, `ai_call_failed`, `llm_response_malformed`,
//! `internal`. The HTTP status mapping lives in the `translator` binary
//! crate, which is the only place that knows about HTTP.

#[derive(thiserror::Error, Debug)]
pub enum TranslatorError {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("authentication failed")]
    AuthFailed,

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("ai backend unavailable")]
    AiUnavailable,

    #[error("ai call failed: {0}")]
    AiCallFailed(String),

    #[error("llm response malformed: {0}")]
    LlmResponseMalformed(String),

    #[error(transparent)]
    Internal(#[from] color_eyre::eyre::Report),
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
