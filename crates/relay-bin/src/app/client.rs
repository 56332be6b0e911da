//! One-shot client commands against a running relay.

use relay_config::Paths;
use relay_ipc::{IpcClient, Method, PullParams, PullReply, SendParams, SendReply};

fn connect(paths: &Paths) -> Result<IpcClient, Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();
    if !socket_path.exists() {
        return Err("relay is not running (socket not found); start it with 'chat-relay serve'".into());
    }
    Ok(IpcClient::new(&socket_path))
}

/// Send a message and print the relay's reply.
pub async fn send_message(
    paths: &Paths,
    chat: String,
    sender: String,
    text: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect(paths)?;
    let params = serde_json::to_value(SendParams { chat, sender, text })?;

    let reply: SendReply = client
        .call_method_with_params(Method::ChatSend, params)
        .await?
        .into_result()?;

    println!("{} (code {})", reply.msg, reply.code);
    Ok(())
}

/// Pull one page and print it.
pub async fn pull_messages(
    paths: &Paths,
    chat: String,
    cursor: i64,
    limit: i32,
    reverse: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect(paths)?;
    let params = serde_json::to_value(PullParams {
        chat,
        cursor,
        limit,
        reverse,
    })?;

    let reply: PullReply = client
        .call_method_with_params(Method::ChatPull, params)
        .await?
        .into_result()?;

    print!("{}", format_page(&reply));
    Ok(())
}

fn format_page(reply: &PullReply) -> String {
    let mut out = String::new();
    for message in &reply.messages {
        let at = chrono::DateTime::from_timestamp(message.send_time, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| message.send_time.to_string());
        out.push_str(&format!("[{}] {}: {}\n", at, message.sender, message.text));
    }
    if reply.has_more {
        out.push_str(&format!("-- more (next cursor {})\n", reply.next_cursor));
    } else {
        out.push_str("-- end\n");
    }
    out
}
