use newsdesk_service::{
    AppState, DefaultAppState,
    config::Config,
    routes::create_router,
    shutdown::{StoreFile, shutdown_signal},
    store,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, filter::Directive};

#[tokio::main]
async fn main() {
    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "newsdesk_service=debug".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    if let Err(err) = config.validate() {
        error!(error = %err, "Invalid configuration");
        std::process::exit(1);
    }

    let connection = store::establish(&config.store.database_url).unwrap_or_else(|err| {
        error!(database_url = %config.store.database_url, error = %err, "Failed to open store");
        std::process::exit(1);
    });

    let app_state = DefaultAppState::new(store::shared(connection), &config).unwrap_or_else(|err| {
        error!(error = %err, "Failed to build dashboard");
        std::process::exit(1);
    });

    if config.startup.fetch {
        match app_state.dashboard().bootstrap().await {
            Ok((posts, news)) => info!(posts = ?posts, news_stored = news.stored, "Startup fetch finished"),
            Err(err) => warn!(error = %err, "Startup fetch failed, serving what the store has"),
        }
    }

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        )
        .with_state(app_state);

    let bind_addr = config.server.bind_addr.as_str();
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %bind_addr, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!("Server running on http://{bind_addr}");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
    }

    if config.store.remove_on_exit {
        StoreFile::from_database_url(&config.store.database_url).teardown();
    }
    info!("Shutdown complete");
}
