// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Racetrack session inspector.
//!
//! Opens the persisted session, authorizes a path (default: the landing
//! page) and prints the routing decision as JSON. When the path mounts a
//! protected page, the session monitor keeps running until the session
//! expires or Ctrl-C is pressed.

use racetrack_session::{
    config::Config,
    middleware::{require_auth, Mount},
    routes::{MemoryNavigator, Navigator, RouteDecision},
    services::HttpAuthApi,
    store::FileStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.landing_path.clone());

    tracing::info!(
        store = %config.store_path.display(),
        api = %config.api_base_url,
        "Starting racetrack session core"
    );

    let kv = Arc::new(FileStore::open(&config.store_path)?);
    let api = Arc::new(HttpAuthApi::new(config.api_base_url.as_str()));
    let navigator = Arc::new(MemoryNavigator::new(&path));

    let state = Arc::new(AppState::new(config, kv, api, navigator.clone()));
    let mut authorizer = state.authorizer();

    let mount = require_auth(&state, &mut authorizer, &path);
    let decision = match &mount {
        Mount::Redirected(to) => RouteDecision::redirect(to.as_str()),
        Mount::Protected(view) => RouteDecision::render(view.page().clone()),
        Mount::Public(page) => RouteDecision::render(page.clone()),
    };
    println!("{}", serde_json::to_string(&decision)?);

    if let Mount::Protected(mut view) = mount {
        tracing::info!("Monitoring session, press Ctrl-C to stop");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
            }
            _ = view.wait_for_session_end() => {
                println!(
                    "{}",
                    serde_json::to_string(&RouteDecision::redirect(navigator.current_path()))?
                );
            }
        }
        view.unmount();
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("racetrack_session=debug,info")),
        )
        .with(format)
        .init();
}
