// src/main.rs
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod calendar;
mod candidates;
mod holidays;
mod ics;
mod locale;
mod plan;
mod planner_tests;
mod scoring;
mod selection;

use holidays::{HolidayProvider, NagerClient};

//=============================================================================
// Configuration
//=============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_holiday_api_base")]
    pub holiday_api_base: String,
}

fn default_app_name() -> String {
    "Max Days Off API".to_string()
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_holiday_api_base() -> String {
    "https://date.nager.at".to_string()
}

impl Settings {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Settings>()
    }
}

//=============================================================================
// Application state and startup
//=============================================================================

#[derive(Clone)]
pub struct AppState {
    pub holiday_provider: Arc<HolidayProvider>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("Loading settings from environment failed")?;
    info!("Configuration loaded for {}.", settings.app_name);

    let holiday_source =
        NagerClient::new(&settings.holiday_api_base).context("Configuring holiday source failed")?;
    let state = AppState {
        holiday_provider: Arc::new(HolidayProvider::new(Arc::new(holiday_source))),
    };

    let api_routes = Router::new()
        .route("/plan", post(api::handle_plan))
        .route("/holidays", get(api::handle_holidays))
        .route("/export/ics", post(api::handle_export_ics));
    let app = Router::new()
        .nest("/api", api_routes)
        .route("/healthz", get(api::handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", settings.server_host, settings.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Binding {} failed", addr))?;
    info!("Starting {} on http://{}", settings.app_name, addr);
    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
