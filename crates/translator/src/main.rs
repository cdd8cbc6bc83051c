use clap::Parser;
use color_eyre::eyre::Result;
use translator::{build_services, router};
use translator_core::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = "Natural-language-to-Scryfall query translator service")]
struct App {
    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
struct Global {
    /// Host to bind to
    #[clap(long, env = "TRANSLATOR_HOST", global = true, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[clap(long, env = "TRANSLATOR_PORT", global = true, default_value = "8080")]
    port: u16,

    /// Allowed CORS origin
    #[clap(long, env = "TRANSLATOR_CORS_ORIGIN", global = true)]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let app = App::parse();
    let config = Config::from_env();

    if config.run_query_validation_checks {
        run_self_test_battery();
    }

    let services = build_services(config).await;
    let app_router = router(services, app.global.cors_origin);

    let addr = format!("{}:{}", app.global.host, app.global.port);
    tracing::info!(%addr, "starting translator service");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app_router).await?;

    Ok(())
}

/// A small battery of known-good translations run at startup when
/// `RUN_QUERY_VALIDATION_CHECKS=1`, logging any that fail to parse
/// deterministically. Not a substitute for the test suite — a quick
/// smoke check against the live mapping tables.
fn run_self_test_battery() {
    let samples = [
        "mono red creatures",
        "blue and black instants",
        "legendary creatures with flying",
    ];

    for sample in samples {
        match translator_core::parser::build_ir(sample) {
            translator_core::parser::ParseOutcome::Ir(built) if built.remaining.trim().is_empty() => {
                tracing::debug!(query = sample, "self-test: fully parsed deterministically");
            }
            _ => {
                tracing::warn!(query = sample, "self-test: query did not fully parse deterministically");
            }
        }
    }
}
