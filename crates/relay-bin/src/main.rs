//! Chat relay - two-party message rooms over a local socket.

mod app;
mod ipc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relay_config::{init_logging, Config, Paths, StoreKind};
use room_ledger::PagePolicy;

/// Chat relay command-line interface.
#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(about = "Two-party chat relay backed by an ordered store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (socket, logs, config). Defaults to ~/.chat-relay
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay in the foreground
    Serve {
        /// Backing store (memory, redis, sqlite)
        #[arg(long)]
        store: Option<StoreKind>,
        /// Redis URL when the store is redis
        #[arg(long)]
        redis_url: Option<String>,
        /// Page policy for pulls (legacy, exact)
        #[arg(long)]
        page_policy: Option<PagePolicy>,
    },
    /// Stop a running relay
    Stop,
    /// Check relay status
    Status,
    /// Send a message through the running relay
    Send {
        /// Chat descriptor, e.g. alice:bob
        #[arg(long)]
        chat: String,
        /// Sending participant, exactly as named in the chat descriptor
        #[arg(long)]
        sender: String,
        /// Message text
        #[arg(long)]
        text: String,
    },
    /// Pull one page of a room from the running relay
    Pull {
        /// Chat descriptor, e.g. alice:bob
        #[arg(long)]
        chat: String,
        /// Rank to start from
        #[arg(long, default_value_t = 0)]
        cursor: i64,
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: i32,
        /// Newest first
        #[arg(long)]
        reverse: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    match cli.command {
        Some(Commands::Serve {
            store,
            redis_url,
            page_policy,
        }) => {
            if let Some(store) = store {
                config.store = store;
            }
            if let Some(url) = redis_url {
                config.redis_url = url;
            }
            if let Some(policy) = page_policy {
                config.page_policy = policy;
            }
            serve(config, paths).await?;
        }
        None => {
            // Default to serving if no command given
            serve(config, paths).await?;
        }
        Some(Commands::Stop) => {
            init_logging(&config.log_level, None)?;
            app::stop_relay(&paths).await?;
        }
        Some(Commands::Status) => {
            init_logging(&config.log_level, None)?;
            app::check_status(&paths).await?;
        }
        Some(Commands::Send { chat, sender, text }) => {
            init_logging(&config.log_level, None)?;
            app::send_message(&paths, chat, sender, text).await?;
        }
        Some(Commands::Pull {
            chat,
            cursor,
            limit,
            reverse,
        }) => {
            init_logging(&config.log_level, None)?;
            app::pull_messages(&paths, chat, cursor, limit, reverse).await?;
        }
    }

    Ok(())
}

async fn serve(config: Config, paths: Paths) -> Result<(), Box<dyn std::error::Error>> {
    paths.ensure_dirs()?;
    init_logging(&config.log_level, Some(&paths.relay_log_file()))?;
    app::run_relay(config, paths).await
}
