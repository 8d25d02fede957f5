use std::sync::Arc;

use auth::HashingCost;
use auth::PasswordHasher;
use auth::TokenIssuer;
use sso_service::config::AppConfig;
use sso_service::domain::auth::models::App;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::repositories::InMemoryStore;
use sso_service::proto::auth_client::AuthClient;
use sso_service::proto::auth_server::AuthServer;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const APP_ID: i32 = 1;
pub const APP_SECRET: &str = "super-secret";
pub const TOKEN_TTL_SECS: i64 = 3600;

pub type TestAuthService = AuthService<InMemoryStore, InMemoryStore, InMemoryStore>;

/// Auth service over a fresh in-memory store with one provisioned application
pub async fn test_service() -> (Arc<TestAuthService>, Arc<InMemoryStore>) {
    let app = AppConfig {
        id: APP_ID,
        name: "test".to_string(),
        secret: APP_SECRET.to_string(),
    };

    service_with_apps(vec![app.to_app().unwrap()]).await
}

/// Auth service over a fresh in-memory store holding `apps`
pub async fn service_with_apps(apps: Vec<App>) -> (Arc<TestAuthService>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    for app in apps {
        store.insert_app(app).await;
    }

    // Minimal cost keeps the suite fast
    let password_hasher = PasswordHasher::with_cost(HashingCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("Failed to build password hasher");

    let service = Arc::new(AuthService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        password_hasher,
        TokenIssuer::new(chrono::Duration::seconds(TOKEN_TTL_SECS)),
    ));

    (service, store)
}

/// Test application that spawns a real gRPC server
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub client: AuthClient<Channel>,
}

impl TestApp {
    /// Spawn the gRPC server in a background task and connect a client to it
    pub async fn spawn() -> Self {
        let (service, store) = test_service().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let grpc_service = AuthGrpcService::new(service);
        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServer::new(grpc_service))
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await
                .expect("Server error");
        });

        let client = AuthClient::connect(address)
            .await
            .expect("Failed to connect gRPC client");

        Self { store, client }
    }
}
