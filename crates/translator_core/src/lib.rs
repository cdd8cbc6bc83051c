//! Core translation pipeline: normalizer, deterministic parser, IR
//! renderer, validator, cache, pattern table, circuit breaker, LLM
//! client, and the orchestrator tying them together.
//!
//! Framework-agnostic: no HTTP, no CLI. The `translator` binary crate is
//! the thin shell around this library.

pub mod cache;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod ir;
pub mod llm;
pub mod normalizer;
pub mod orchestrator;
pub mod parser;
pub mod pattern_table;
pub mod renderer;
pub mod result;
pub mod tables;
pub mod task_queue;
pub mod validator;

pub use error::{Result, TranslatorError};
pub use orchestrator::{translate, DebugOptions, Filters, Services, TranslateRequest};
pub use result::{Explanation, Source, TranslationOutcome, TranslationResponse};
