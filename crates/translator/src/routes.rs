//! Route handlers: `POST /translate` and `GET /healthz` (§6).

use crate::error::ApiError;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use translator_core::{DebugOptions, Filters, Services, TranslateRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilters {
    pub format: Option<String>,
    pub color_identity: Option<Vec<String>>,
    pub max_cmc: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestDebug {
    #[serde(default)]
    pub force_fallback: bool,
    #[serde(default)]
    pub simulate_ai_failure: bool,
    pub overly_broad_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBody {
    pub query: String,
    pub filters: Option<RequestFilters>,
    #[serde(default)]
    pub use_cache: bool,
    pub cache_salt: Option<String>,
    pub debug: Option<RequestDebug>,
}

pub async fn translate_handler(
    State(services): State<Arc<Services>>,
    Json(body): Json<TranslateBody>,
) -> impl IntoResponse {
    if body.query.is_empty() || body.query.len() > 500 {
        return ApiError(translator_core::TranslatorError::InputInvalid(
            "query must be between 3 and 500 characters".to_string(),
        ))
        .into_response();
    }

    let filters = body.filters.map(|f| Filters {
        format: f.format,
        color_identity: f.color_identity,
        max_cmc: f.max_cmc,
    }).unwrap_or_default();

    let debug = body.debug.map(|d| DebugOptions {
        force_fallback: d.force_fallback,
        simulate_ai_failure: d.simulate_ai_failure,
    }).unwrap_or_default();

    let request = TranslateRequest {
        query: body.query,
        filters,
        use_cache: body.use_cache,
        cache_salt: body.cache_salt,
        debug,
    };

    let response = translator_core::translate(&services, request).await;
    Json(response).into_response()
}

pub async fn healthz_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
