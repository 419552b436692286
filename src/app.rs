/*
 * Responsibility
 * - courier サービス共通の起動まわり (tracing / panic hook / serve)
 * - 各サービスは Router を組み立てて run() に渡す
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,courier_service=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

/// Bind and serve a fully assembled router.
///
/// 例：
/// ```ignore
/// app::init_tracing();
/// let config = Config::from_env()?;
/// app::init_panic_hook(!config.app_env.is_production());
///
/// let verifier = JwtVerifier::new(&config.jwt_secret);
/// let router = middleware::http::apply(middleware::jwt::apply(routes(), verifier));
/// app::run(router, &config).await
/// ```
pub async fn run(router: Router, config: &Config) -> Result<()> {
    tracing::info!(
        "starting service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
