use anyhow::Result;
use marketplace_admin::{
    application::{
        ports::{rate_limit::RateLimitStore, security::IdentityVerifier, time::Clock},
        services::{ApplicationServices, PipelineSettings, dispatch::spawn_failure_logger},
    },
    config::AppConfig,
    domain::{
        audit::AuditLogRepository, entity::EntityStore, notification::NotificationRepository,
        user::UserDirectory,
    },
    infrastructure::{
        database,
        rate_limit::{InMemoryRateLimitStore, RedisRateLimitStore},
        repositories::{
            InMemoryAuditLogRepository, InMemoryEntityStore, InMemoryNotificationRepository,
            InMemoryUserDirectory, MemorySeed, PostgresAuditLogRepository, PostgresEntityStore,
            PostgresNotificationRepository, PostgresUserDirectory,
        },
        security::BiscuitIdentityVerifier,
        time::SystemClock,
    },
    presentation::http::{
        routes::{RouterOptions, build_router_with_options},
        state::HttpState,
    },
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

struct Stores {
    entities: Arc<dyn EntityStore>,
    directory: Arc<dyn UserDirectory>,
    audit: Arc<dyn AuditLogRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let stores = match config.database_url() {
        Some(url) => {
            let pool = database::init_pool(url).await?;
            database::run_migrations(&pool).await?;
            tracing::info!("using postgres stores");
            Stores {
                entities: Arc::new(PostgresEntityStore::new(pool.clone())),
                directory: Arc::new(PostgresUserDirectory::new(pool.clone())),
                audit: Arc::new(PostgresAuditLogRepository::new(pool.clone())),
                notifications: Arc::new(PostgresNotificationRepository::new(pool)),
            }
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            let entities = Arc::new(InMemoryEntityStore::new());
            let directory = Arc::new(InMemoryUserDirectory::new());
            if let Some(path) = config.memory_seed_path() {
                let counts = MemorySeed::from_json(&std::fs::read_to_string(path)?)?
                    .apply(&entities, &directory)?;
                tracing::info!(
                    path,
                    subjects = counts.subjects,
                    entities = counts.entities,
                    "seeded in-memory stores"
                );
            } else {
                tracing::warn!("MEMORY_SEED_PATH not set, no admin can be authorized");
            }
            Stores {
                entities,
                directory,
                audit: Arc::new(InMemoryAuditLogRepository::new()),
                notifications: Arc::new(InMemoryNotificationRepository::new()),
            }
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let settings = config.pipeline();

    let rate_limit_store: Arc<dyn RateLimitStore> = match config.redis_url() {
        Some(url) => {
            tracing::info!("using redis rate-limit store");
            Arc::new(RedisRateLimitStore::from_url(url)?)
        }
        None => {
            let store = Arc::new(InMemoryRateLimitStore::new());
            spawn_rate_limit_pruner(Arc::clone(&store), Arc::clone(&clock), settings);
            store
        }
    };

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(BiscuitIdentityVerifier::new(
        config.biscuit_private_key(),
        config.token_ttl(),
    )?);

    let (services, failures) = ApplicationServices::new(
        stores.entities,
        stores.directory,
        stores.audit,
        stores.notifications,
        verifier,
        rate_limit_store,
        Arc::clone(&clock),
        settings,
    );
    let failure_logger = spawn_failure_logger(failures);
    let services = Arc::new(services);

    let state = HttpState {
        services: Arc::clone(&services),
    };
    let options = RouterOptions {
        allowed_origins: config.allowed_origins().to_vec(),
        ip_flood: Some(config.ip_flood()),
    };

    let app = build_router_with_options(state, &options);
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    // Closing the hub ends live feeds so open SSE connections do not hold up
    // graceful shutdown.
    let hub = services.notifications.hub().clone();
    axum::serve(listener, service)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            hub.close();
        })
        .await?;

    failure_logger.abort();
    Ok(())
}

fn spawn_rate_limit_pruner(
    store: Arc<InMemoryRateLimitStore>,
    clock: Arc<dyn Clock>,
    settings: PipelineSettings,
) {
    let presets = settings.presets;
    let longest = [presets.admin, presets.api]
        .iter()
        .map(|preset| preset.window)
        .max()
        .unwrap_or(Duration::from_secs(300));
    let longest = chrono::Duration::from_std(longest).unwrap_or_else(|_| chrono::Duration::minutes(5));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            store.prune(clock.now(), longest);
        }
    });
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
