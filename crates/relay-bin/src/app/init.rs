//! Relay initialization.

use crate::app::RelayState;
use crate::ipc::register_handlers;
use relay_config::{Config, Paths, StoreKind};
use relay_ipc::{IpcClient, IpcServer, Method};
use room_ledger::{Ledger, LedgerOptions, MemoryStore, OrderedStore, RedisStore, SqliteStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Open the configured ordered store.
pub async fn open_store(
    config: &Config,
    paths: &Paths,
) -> Result<Arc<dyn OrderedStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn OrderedStore> = match config.store {
        StoreKind::Memory => {
            warn!("Using in-memory store; messages are lost when the relay exits");
            Arc::new(MemoryStore::new())
        }
        StoreKind::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
        StoreKind::Sqlite => {
            let path = paths.database_file();
            let store = SqliteStore::open(&path)?;
            info!(path = %path.display(), "SQLite store opened");
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Run the relay until it is asked to shut down.
pub async fn run_relay(config: Config, paths: Paths) -> Result<(), Box<dyn std::error::Error>> {
    // Singleton enforcement: refuse to start next to a live relay
    let socket_path = paths.socket_file();
    if socket_path.exists() {
        let client = IpcClient::new(&socket_path);
        if client.call_method(Method::Health).await.is_ok() {
            return Err(format!(
                "relay is already running on {}; use 'chat-relay stop' first",
                socket_path.display()
            )
            .into());
        }
        warn!(socket = %socket_path.display(), "Removing stale socket file");
        let _ = std::fs::remove_file(&socket_path);
    }

    let pid_file = paths.pid_file();
    if pid_file.exists() {
        let _ = std::fs::remove_file(&pid_file);
    }

    info!(
        store = %config.store,
        page_policy = %config.page_policy,
        key_prefix = %config.key_prefix,
        "Starting chat relay"
    );

    paths.ensure_dirs()?;

    let store = open_store(&config, &paths).await?;
    let ledger = Ledger::with_options(
        store,
        LedgerOptions {
            policy: config.page_policy,
            key_prefix: config.key_prefix.clone(),
        },
    );

    let pid = std::process::id();
    std::fs::write(&pid_file, pid.to_string())?;
    info!(pid = pid, "Relay started");

    let ipc_server = IpcServer::new(&socket_path);
    let state = RelayState::new(ledger, config, paths.clone());
    register_handlers(&ipc_server, state).await;

    // Ctrl-C takes the same path as the shutdown method
    let shutdown_tx = ipc_server.shutdown_sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            let _ = shutdown_tx.send(());
        }
    });

    info!(socket = %socket_path.display(), "IPC server starting");
    let server_result = ipc_server.run().await;

    let _ = std::fs::remove_file(&pid_file);
    let _ = std::fs::remove_file(&socket_path);

    info!("Relay stopped");

    server_result.map_err(|e| e.into())
}
