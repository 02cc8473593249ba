use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use meal_planner::MealPlanService;
use meal_planner::config::ServerConfig;
use meal_planner::routes::{AppState, router};
use meal_planner::store::{DietStore, InMemoryDietStore, PostgrestDietStore};
use spoonacular_client::RecipeClient;
use spoonacular_client::http_client::ReqwestRecipeClient;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ServerConfig::from_env()?;

    let env_filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(log_env = %config.log_filter, "meal_planner:http: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let client: Arc<dyn RecipeClient> = Arc::new(ReqwestRecipeClient::from_config(&config.recipes));
    if !client.is_configured() {
        tracing::warn!("SPOONACULAR_API_KEY is not set; plan generation will report setup instructions");
    }

    let store: Arc<dyn DietStore> = match &config.supabase {
        Some(sb) => {
            info!(url = %sb.url, "saving diets to Supabase");
            Arc::new(PostgrestDietStore::new(&sb.url, sb.key.clone()))
        }
        None => {
            tracing::warn!("SUPABASE_URL/SUPABASE_KEY not set; saved diets are kept in memory");
            Arc::new(InMemoryDietStore::new())
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = Arc::new(AppState {
        service: MealPlanService::new(client, store),
        metrics: handle,
        shutdown: shutdown_rx,
    });

    let app = router(state).layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ));

    let addr = config.address;
    info!(%addr, timeout_secs = config.request_timeout.as_secs(), "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async move {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
            info!("shutting down; cancelling running plan generations");
            let _ = shutdown_tx.send(true);
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
