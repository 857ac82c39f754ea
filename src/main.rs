use std::sync::Arc;

use nutri_profile::config::WizardConfig;
use nutri_profile::error;
use nutri_profile::store::{
    AuthProvider, LibSqlCache, LocalCache, MemoryRemote, ProfileStore, SessionAuth, SessionEvent,
};
use nutri_profile::wizard::{StepCatalog, WizardController, WizardRouteState, wizard_routes};
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = load_config().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!("🥗 Nutri Profile v{}", env!("CARGO_PKG_VERSION"));

    // ── Local cache ─────────────────────────────────────────────────────
    let cache: Arc<dyn LocalCache> = Arc::new(open_cache(&config).await.unwrap_or_else(|e| {
        eprintln!("Error: {} (path {})", e, config.db_path.display());
        std::process::exit(1);
    }));
    eprintln!("   Cache: {} (key {})", config.db_path.display(), config.cache_key);

    // ── Auth + remote ───────────────────────────────────────────────────
    let auth = Arc::new(SessionAuth::new());
    spawn_session_logger(auth.subscribe());
    if let Some(user_id) = &config.user_id {
        auth.sign_in(user_id.clone()).await;
    }
    let remote = Arc::new(MemoryRemote::new());

    let store = Arc::new(
        ProfileStore::open(cache, remote, auth.clone(), config.cache_key.clone()).await,
    );
    if store.is_authenticated().await {
        if let Err(e) = store.load_remote().await {
            tracing::warn!("Initial profile load failed: {}", e);
        }
    }
    eprintln!(
        "   User: {}",
        config.user_id.as_deref().unwrap_or("(anonymous)")
    );

    // ── Wizard ──────────────────────────────────────────────────────────
    let catalog = Arc::new(StepCatalog::standard());
    eprintln!("   Steps: {}", catalog.len());
    let controller = Arc::new(WizardController::new(store, catalog));

    let app = wizard_routes(WizardRouteState { controller });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    eprintln!("   Wizard API: http://0.0.0.0:{}/api/wizard\n", config.port);
    tracing::info!(port = config.port, "Wizard server started");
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_config() -> error::Result<WizardConfig> {
    Ok(WizardConfig::from_env()?)
}

async fn open_cache(config: &WizardConfig) -> error::Result<LibSqlCache> {
    Ok(LibSqlCache::new_local(&config.db_path).await?)
}

/// Log auth session changes until the sender goes away.
fn spawn_session_logger(mut rx: broadcast::Receiver<SessionEvent>) {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(SessionEvent::SignedIn { user_id }) => {
                    tracing::info!(user_id = %user_id, "Session started");
                }
                Ok(SessionEvent::SignedOut) => tracing::info!("Session ended"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(missed = n, "Session logger lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
