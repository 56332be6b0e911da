//! Chat send and pull handlers.

use crate::app::RelayState;
use relay_ipc::{
    error_codes, IpcServer, Method, PullParams, PullReply, Request, Response, SendParams,
    SendReply, WireMessage,
};
use room_ledger::{LedgerError, Page};
use serde::Serialize;
use tracing::{debug, warn};

/// Register chat handlers.
pub async fn register(server: &IpcServer, state: RelayState) {
    register_send(server, state.clone()).await;
    register_pull(server, state).await;
}

async fn register_send(server: &IpcServer, state: RelayState) {
    server
        .register_handler(Method::ChatSend, move |req| {
            let ledger = state.ledger.clone();
            async move {
                let params: SendParams = match req.parse_params() {
                    Ok(p) => p,
                    Err(e) => return invalid_params(&req, e),
                };

                match ledger.send(&params.chat, &params.sender, &params.text).await {
                    Ok(message) => {
                        debug!(chat = %params.chat, timestamp = message.timestamp, "chat.send ok");
                        reply(&req, &SendReply::ok())
                    }
                    Err(e) => ledger_error(&req, &params.chat, e),
                }
            }
        })
        .await;
}

async fn register_pull(server: &IpcServer, state: RelayState) {
    server
        .register_handler(Method::ChatPull, move |req| {
            let ledger = state.ledger.clone();
            async move {
                let params: PullParams = match req.parse_params() {
                    Ok(p) => p,
                    Err(e) => return invalid_params(&req, e),
                };

                match ledger
                    .pull(&params.chat, params.cursor, params.limit, params.reverse)
                    .await
                {
                    Ok(page) => reply(&req, &pull_reply(page)),
                    Err(e) => ledger_error(&req, &params.chat, e),
                }
            }
        })
        .await;
}

fn pull_reply(page: Page) -> PullReply {
    PullReply {
        code: 0,
        msg: "success".to_string(),
        messages: page
            .messages
            .into_iter()
            .map(|m| WireMessage {
                chat: m.chat,
                text: m.text,
                sender: m.sender,
                send_time: m.send_time,
            })
            .collect(),
        has_more: page.has_more,
        next_cursor: page.next_cursor,
    }
}

fn reply<T: Serialize>(req: &Request, result: &T) -> Response {
    match serde_json::to_value(result) {
        Ok(value) => Response::success(&req.id, value),
        Err(e) => Response::error(&req.id, error_codes::INTERNAL_ERROR, &e.to_string()),
    }
}

fn invalid_params(req: &Request, e: serde_json::Error) -> Response {
    Response::error(
        &req.id,
        error_codes::INVALID_PARAMS,
        &format!("Invalid parameters: {}", e),
    )
}

/// Maps a ledger failure to its response code.
fn ledger_error(req: &Request, chat: &str, err: LedgerError) -> Response {
    let code = match &err {
        LedgerError::InvalidChatFormat(_) | LedgerError::InvalidPageRequest(_) => {
            error_codes::INVALID_PARAMS
        }
        LedgerError::NotAMember { .. } => error_codes::FORBIDDEN,
        LedgerError::StorageFailure(_) => {
            warn!(chat = %chat, method = ?req.method, error = %err, "Storage failure");
            error_codes::STORAGE_FAILURE
        }
    };
    Response::error(&req.id, code, &err.to_string())
}
