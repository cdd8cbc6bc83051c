//! The `translator` binary's guts, split into a library target so the
//! HTTP layer can be exercised from an integration test (`tests/`)
//! without spawning a real listener.

pub mod error;
pub mod request_id;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use translator_core::cache::durable::{InMemoryDurableCache, PostgresDurableCache};
use translator_core::cache::Cache;
use translator_core::circuit_breaker::CircuitBreaker;
use translator_core::config::Config;
use translator_core::llm::LlmClient;
use translator_core::pattern_table::{EmptyRuleStore, PatternTable, PostgresRuleStore, RuleStore};
use translator_core::Services;

pub async fn build_services(config: Config) -> Arc<Services> {
    let pool = match &config.database_url {
        Some(url) => match sqlx::PgPool::connect(url).await {
            Ok(pool) => Some(pool),
            Err(err) => {
                tracing::warn!(error = %err, "could not connect to durable store, running with in-memory cache only");
                None
            }
        },
        None => None,
    };

    let durable: Arc<dyn translator_core::cache::durable::DurableCache> = match &pool {
        Some(pool) => Arc::new(PostgresDurableCache::new(pool.clone())),
        None => Arc::new(InMemoryDurableCache::new()),
    };

    let rule_store: Box<dyn RuleStore> = match &pool {
        Some(pool) => Box::new(PostgresRuleStore::new(pool.clone())),
        None => Box::new(EmptyRuleStore),
    };
    let patterns = PatternTable::load(rule_store.as_ref()).await;

    let llm = config
        .has_llm_key()
        .then(|| LlmClient::new(config.llm_base_url.clone(), config.llm_api_key.clone().unwrap(), config.llm_timeout));

    Arc::new(Services {
        cache: Cache::new(durable),
        breaker: CircuitBreaker::new(),
        patterns,
        llm,
        config,
        tasks: translator_core::task_queue::TaskQueue::spawn(),
    })
}

pub fn router(services: Arc<Services>, cors_origin: Option<String>) -> Router {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>().unwrap())
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/translate", post(routes::translate_handler))
        .route("/healthz", get(routes::healthz_handler))
        .layer(axum::middleware::from_fn(request_id::propagate_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(services)
}
