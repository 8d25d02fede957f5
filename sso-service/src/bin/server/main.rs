use std::sync::Arc;

use auth::HashingCost;
use auth::PasswordHasher;
use auth::TokenIssuer;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sso_service::config::Config;
use sso_service::domain::auth::ports::AppProvider;
use sso_service::domain::auth::ports::UserProvider;
use sso_service::domain::auth::ports::UserSaver;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::inbound::http::router::create_router;
use sso_service::outbound::repositories::InMemoryStore;
use sso_service::outbound::repositories::PostgresStore;
use sso_service::proto::auth_server::AuthServer;
use tokio::sync::watch;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Single sign-on credential service
#[derive(Parser, Debug)]
#[command(name = "sso-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a config file layered over config/default and config/{RUN_MODE}
    #[arg(long = "config", env = "CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sso_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "sso-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load(args.config.as_deref())?;

    tracing::info!(
        env = %config.env,
        in_memory_store = config.database.is_in_memory(),
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        request_timeout_ms = config.server.request_timeout_ms,
        token_ttl_secs = config.token.ttl_secs,
        configured_apps = config.apps.len(),
        "Configuration loaded"
    );

    if config.database.is_in_memory() {
        tracing::warn!("Using in-memory credential store; data is lost on exit");
        let store = Arc::new(InMemoryStore::new());
        for app in config.provisioned_apps()? {
            tracing::info!(app_id = %app.id, name = %app.name, "Application provisioned");
            store.insert_app(app).await;
        }
        if config.apps.is_empty() {
            tracing::warn!("No applications configured; every login will be rejected");
        }
        return serve(config, store).await;
    }

    if !config.apps.is_empty() {
        tracing::warn!("Configured apps are ignored; PostgreSQL reads the apps table");
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    serve(config, Arc::new(PostgresStore::new(pg_pool))).await
}

async fn serve<ST>(config: Config, store: Arc<ST>) -> Result<(), anyhow::Error>
where
    ST: UserSaver + UserProvider + AppProvider,
{
    let password_hasher = PasswordHasher::with_cost(HashingCost::from(&config.hashing))?;
    let token_issuer = TokenIssuer::new(config.token.ttl());

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        password_hasher,
        token_issuer,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(Arc::clone(&auth_service));
    let mut http_shutdown = shutdown_rx.clone();
    let http_server = tokio::spawn(async move {
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(async move {
                let _ = http_shutdown.changed().await;
            })
            .await
    });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(Arc::clone(&auth_service));
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let request_timeout = config.server.request_timeout();
    let mut grpc_shutdown = shutdown_rx;
    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .timeout(request_timeout)
            .add_service(AuthServer::new(grpc_service))
            .serve_with_shutdown(grpc_address, async move {
                let _ = grpc_shutdown.changed().await;
            })
            .await
    });

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping servers");
        let _ = shutdown_tx.send(true);
    });

    match tokio::try_join!(http_server, grpc_server) {
        Ok((http_result, grpc_result)) => {
            if let Err(e) = http_result {
                tracing::error!(error = %e, "Http server error");
            }
            if let Err(e) = grpc_result {
                tracing::error!(error = %e, "gRpc server error");
            }
            tracing::info!("Servers exited");
        }
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    };

    tracing::info!("Application stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag() {
        let args = Args::try_parse_from(["sso-service", "--config", "local.toml"]).unwrap();
        assert_eq!(args.config.as_deref(), Some("local.toml"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["sso-service", "--bogus"]).is_err());
    }
}
