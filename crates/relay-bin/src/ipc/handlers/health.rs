//! Health and shutdown handlers.

use crate::app::RelayState;
use relay_ipc::{IpcServer, Method, Response};
use tracing::info;

/// Register health and shutdown handlers.
pub async fn register(server: &IpcServer, state: RelayState) {
    server
        .register_handler(Method::Health, move |req| {
            let details = serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "store": state.ledger.backend(),
                "pagePolicy": state.ledger.policy().as_str(),
                "keyPrefix": state.config.key_prefix,
                "socket": state.paths.socket_file().display().to_string(),
            });
            async move { Response::success(&req.id, details) }
        })
        .await;

    let shutdown_tx = server.shutdown_sender();
    server
        .register_handler(Method::Shutdown, move |req| {
            let tx = shutdown_tx.clone();
            async move {
                info!("Shutdown requested over IPC");
                let _ = tx.send(());
                Response::success(&req.id, serde_json::json!({ "status": "shutting_down" }))
            }
        })
        .await;

    info!("Registered health handlers");
}
