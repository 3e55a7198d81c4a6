//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemorySessionAdapter, SystemClock},
    config::Config,
    error::ApiError,
    web::{
        add_activity_handler, add_thought_record_handler, complete_activity_handler,
        export_safety_plan_handler, get_quiz_handler, get_safety_plan_handler,
        get_session_handler, list_activities_handler, list_sections_handler,
        list_thought_records_handler, require_session, reset_session_handler,
        rest::ApiDoc, save_safety_plan_handler, section_handler, state::AppState,
        submit_quiz_handler, timer_ws_handler, worksheet_handler,
    },
};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use mh_toolkit_core::ports::{Clock, SessionRepository};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Adapters ---
    let sessions = Arc::new(InMemorySessionAdapter::new(config.session_ttl));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        sessions: sessions.clone(),
        clock: clock.clone(),
        config: config.clone(),
    });

    // --- 4. Sweep Idle Sessions ---
    let sweep_interval = config.session_sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            match sessions.purge_expired(clock.now()).await {
                Ok(0) => {}
                Ok(removed) => info!("Discarded {} idle sessions.", removed),
                Err(e) => error!("Failed to purge idle sessions: {:?}", e),
            }
        }
    });

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Static routes (no session needed)
    let static_routes = Router::new()
        .route("/sections", get(list_sections_handler))
        .route("/quiz", get(get_quiz_handler).post(submit_quiz_handler))
        .route("/worksheet", get(worksheet_handler));

    // Session-scoped routes
    let session_routes = Router::new()
        .route("/sections/{section}", get(section_handler))
        .route(
            "/thought-records",
            get(list_thought_records_handler).post(add_thought_record_handler),
        )
        .route(
            "/activities",
            get(list_activities_handler).post(add_activity_handler),
        )
        .route("/activities/{index}/done", post(complete_activity_handler))
        .route(
            "/safety-plan",
            get(get_safety_plan_handler).put(save_safety_plan_handler),
        )
        .route("/safety-plan/export", get(export_safety_plan_handler))
        .route("/session", get(get_session_handler))
        .route("/session/reset", post(reset_session_handler))
        .route("/timers/ws", get(timer_ws_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let api_router = Router::new()
        .merge(static_routes)
        .merge(session_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
