use std::sync::Arc;

use account_service::config::Config;
use account_service::config::StorageBackend;
use account_service::domain::auth::ports::AuthServicePort;
use account_service::domain::auth::service::AuthService;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::service::UserService;
use account_service::inbound::access::AccessPolicy;
use account_service::inbound::access::PublicEndpoints;
use account_service::inbound::grpc::GrpcAuthLayer;
use account_service::inbound::grpc::UserGrpcService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::proto::user_service_server::UserServiceServer;
use account_service::reporting::spawn_user_count_reporter;
use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::TokenAuthority;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        token_ttl_secs = config.jwt.ttl_seconds,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.jwt.secret.len() < JwtHandler::RECOMMENDED_SECRET_LEN {
        tracing::warn!(
            secret_len = config.jwt.secret.len(),
            recommended = JwtHandler::RECOMMENDED_SECRET_LEN,
            "JWT secret is shorter than recommended"
        );
    }

    let password_hasher = PasswordHasher::with_cost(config.password_hasher);
    let authenticator = Arc::new(Authenticator::new(
        password_hasher.clone(),
        TokenAuthority::new(config.jwt.secret.as_bytes(), config.jwt.ttl()),
    ));

    let (user_service, auth_service) = match config.database.backend {
        StorageBackend::Postgres => {
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

            build_services(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                password_hasher,
                Arc::clone(&authenticator),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            build_services(
                Arc::new(InMemoryUserRepository::new()),
                password_hasher,
                Arc::clone(&authenticator),
            )
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        Arc::clone(&user_service),
        Arc::clone(&auth_service),
        AccessPolicy::new(PublicEndpoints::http_defaults(), Arc::clone(&authenticator)),
        config.server.request_timeout(),
    );
    let http_shutdown = wait_for(shutdown_rx.clone());
    let http_server = tokio::spawn(async move {
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(http_shutdown)
            .await
    });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = UserGrpcService::new(Arc::clone(&user_service), auth_service);
    let grpc_layer = GrpcAuthLayer::new(AccessPolicy::new(
        PublicEndpoints::grpc_defaults(),
        authenticator,
    ));
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let grpc_timeout = config.server.request_timeout();
    let grpc_shutdown = wait_for(shutdown_rx.clone());
    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .timeout(grpc_timeout)
            .layer(grpc_layer)
            .add_service(UserServiceServer::new(grpc_service))
            .serve_with_shutdown(grpc_address, grpc_shutdown)
            .await
    });

    let reporter = spawn_user_count_reporter(
        user_service,
        config.reporting.interval(),
        shutdown_rx,
    );

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    shutdown_tx.send(true)?;

    match tokio::try_join!(http_server, grpc_server, reporter) {
        Ok((http_result, grpc_result, ())) => {
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

    Ok(())
}

fn build_services<UR>(
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    authenticator: Arc<Authenticator>,
) -> (Arc<dyn UserServicePort>, Arc<dyn AuthServicePort>)
where
    UR: UserRepository,
{
    let user_service: Arc<dyn UserServicePort> =
        Arc::new(UserService::new(Arc::clone(&repository), password_hasher));
    let auth_service: Arc<dyn AuthServicePort> =
        Arc::new(AuthService::new(repository, authenticator));
    (user_service, auth_service)
}

async fn wait_for(mut shutdown: watch::Receiver<bool>) {
    loop {
        let stopped = *shutdown.borrow();
        if stopped || shutdown.changed().await.is_err() {
            break;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
