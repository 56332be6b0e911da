//! Relay lifecycle management (stop, status).

use relay_config::Paths;
use relay_ipc::{IpcClient, Method};
use std::time::Duration;

/// Stop the relay.
pub async fn stop_relay(paths: &Paths) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();
    let pid_path = paths.pid_file();

    if !socket_path.exists() {
        println!("Relay is not running (socket not found)");
        if pid_path.exists() {
            let _ = std::fs::remove_file(&pid_path);
        }
        return Ok(());
    }

    let client = IpcClient::new(&socket_path);

    match client.call_method(Method::Shutdown).await {
        Ok(response) if response.is_success() => println!("Relay shutdown initiated"),
        Ok(response) => println!("Shutdown failed: {:?}", response.error),
        Err(e) => println!("Failed to connect to relay: {}", e),
    }

    // Wait for relay to stop (up to 3 seconds)
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if !socket_path.exists() {
            println!("Relay stopped");
            return Ok(());
        }
    }

    if let Some(pid) = read_pid(&pid_path) {
        println!(
            "Relay did not stop gracefully, sending SIGKILL to PID {}",
            pid
        );
        // SAFETY: kill(2) with a PID read from our own PID file; no memory is shared.
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
        let _ = std::fs::remove_file(&socket_path);
        let _ = std::fs::remove_file(&pid_path);
        println!("Relay killed");
        return Ok(());
    }

    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
        println!("Cleaned up stale socket file");
    }

    Ok(())
}

/// Check relay status.
pub async fn check_status(paths: &Paths) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();

    if !socket_path.exists() {
        println!("Relay is not running (socket not found)");
        return Ok(());
    }

    let client = IpcClient::new(&socket_path);

    match client.call_method(Method::Health).await {
        Ok(response) if response.is_success() => {
            let Some(result) = response.result else {
                println!("Relay is running (no details available)");
                return Ok(());
            };
            let field = |name: &str| {
                result
                    .get(name)
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string()
            };

            println!("Relay is running");
            println!("  Status:      {}", field("status"));
            println!("  Version:     {}", field("version"));
            println!("  Store:       {}", field("store"));
            println!("  Page policy: {}", field("pagePolicy"));
            if let Some(pid) = read_pid(&paths.pid_file()) {
                println!("  PID:         {}", pid);
            }
            println!("  Socket:      {}", socket_path.display());
        }
        Ok(response) => println!("Relay returned error: {:?}", response.error),
        Err(e) => {
            println!("Failed to connect to relay: {}", e);
            println!("Relay may not be running or socket may be stale");
        }
    }

    Ok(())
}

/// Reads the relay PID, ignoring anything that is not a positive process id.
///
/// `kill(0, ..)` and `kill(-1, ..)` target whole process groups, so those
/// values are never returned.
fn read_pid(path: &std::path::Path) -> Option<i32> {
    std::fs::read_to_string(path)
        .ok()?
        .trim()
        .parse()
        .ok()
        .filter(|pid: &i32| *pid > 0)
}
