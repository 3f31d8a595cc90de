use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ministack_core::{
    CreateQueueError, LookupError, MinistackConfig, QueueEngine, ReceiveError, RocksDbStorage,
    SendError,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "ministack", about = "Local SQS-style queue store")]
struct Cli {
    /// Data directory (overrides config and MINISTACK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to ministack.toml, then /etc/ministack/ministack.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage queues
    #[command(subcommand)]
    Queue(QueueCommands),

    /// Send a message to a queue
    Send {
        /// Queue name
        queue: String,

        /// Message body
        body: String,
    },

    /// Receive messages from a queue
    Receive {
        /// Queue name
        queue: String,

        /// Maximum number of messages to return
        #[arg(long)]
        max: Option<usize>,

        /// Seconds to hide received messages from later receives (0 = don't hide)
        #[arg(long)]
        visibility_timeout: Option<u64>,
    },
}

#[derive(Subcommand)]
enum QueueCommands {
    /// Create a queue (no-op if it already exists)
    Create {
        /// Queue name
        name: String,
    },

    /// List queues
    List {
        /// Only list queues whose name starts with this prefix
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Show queue details
    Inspect {
        /// Queue name
        name: String,
    },
}

fn load_config(explicit: Option<&Path>) -> MinistackConfig {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => vec![
            PathBuf::from("ministack.toml"),
            PathBuf::from("/etc/ministack/ministack.toml"),
        ],
    };

    for path in &candidates {
        if !path.exists() {
            if explicit.is_some() {
                eprintln!("Error: config file {} not found", path.display());
                process::exit(1);
            }
            continue;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    return config;
                }
                Err(e) => {
                    eprintln!("Error: parsing {}: {e}", path.display());
                    process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error: reading {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    info!("no config file found, using defaults");
    MinistackConfig::default()
}

fn data_dir(cli_value: Option<PathBuf>, config: &MinistackConfig) -> PathBuf {
    cli_value
        .or_else(|| std::env::var_os("MINISTACK_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(&config.storage.data_dir))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

fn cmd_queue_create(engine: &QueueEngine, name: String) {
    match engine.create_queue(&name) {
        Ok(_) => println!("Created queue \"{name}\""),
        Err(CreateQueueError::InvalidName(e)) => fail(e),
        Err(CreateQueueError::Storage(e)) => fail(e),
    }
}

fn cmd_queue_list(engine: &QueueEngine, prefix: String) {
    let names = match engine.list_queues_with_prefix(&prefix) {
        Ok(names) => names,
        Err(e) => fail(e),
    };
    if names.is_empty() {
        if prefix.is_empty() {
            println!("No queues found.");
        } else {
            println!("No queues matching prefix \"{prefix}\".");
        }
        return;
    }

    let name_width = names
        .iter()
        .map(|n| n.as_str().len())
        .max()
        .unwrap_or(4)
        .max(4);
    println!("{:<name_width$}  {:>7}", "NAME", "DEPTH");
    for name in &names {
        let depth = engine
            .queue_depth(name.as_str())
            .map(|d| d.to_string())
            .unwrap_or_else(|_| "?".to_string());
        println!("{:<name_width$}  {:>7}", name.as_str(), depth);
    }
}

fn cmd_queue_inspect(engine: &QueueEngine, name: String) {
    let queue = match engine.get_queue(&name) {
        Ok(queue) => queue,
        Err(LookupError::QueueNotFound(_)) => fail(format!("queue \"{name}\" does not exist")),
        Err(LookupError::Storage(e)) => fail(e),
    };
    let stats = match engine.queue_stats(&name) {
        Ok(stats) => stats,
        Err(e) => fail(e),
    };
    println!("Queue: {}", queue.name);
    println!("  Created at (ms): {}", queue.created_at);
    println!("  Depth:           {}", stats.visible + stats.hidden);
    println!("  Visible:         {}", stats.visible);
    println!("  Hidden:          {}", stats.hidden);
}

fn cmd_send(engine: &QueueEngine, queue: String, body: String) {
    match engine.send(&queue, body.into_bytes()) {
        Ok(id) => println!("{id}"),
        Err(SendError::QueueNotFound(_)) => fail(format!("queue \"{queue}\" does not exist")),
        Err(e) => fail(e),
    }
}

fn cmd_receive(engine: &QueueEngine, queue: String, max: usize, visibility_timeout: u64) {
    let messages = match engine.receive(&queue, max, visibility_timeout) {
        Ok(messages) => messages,
        Err(ReceiveError::QueueNotFound(_)) => fail(format!("queue \"{queue}\" does not exist")),
        Err(ReceiveError::Storage(e)) => fail(e),
    };
    if messages.is_empty() {
        println!("No messages available.");
        return;
    }
    for m in &messages {
        println!(
            "{}  created_at={}  receives={}  {}",
            m.id,
            m.created_at,
            m.receive_count,
            String::from_utf8_lossy(&m.payload)
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ministack_core::telemetry::init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let dir = data_dir(cli.data_dir, &config);

    info!(data_dir = %dir.display(), "opening storage");
    let storage = Arc::new(RocksDbStorage::open(&dir)?);
    let engine = QueueEngine::new(storage);

    match cli.command {
        Commands::Queue(cmd) => match cmd {
            QueueCommands::Create { name } => cmd_queue_create(&engine, name),
            QueueCommands::List { prefix } => cmd_queue_list(&engine, prefix),
            QueueCommands::Inspect { name } => cmd_queue_inspect(&engine, name),
        },
        Commands::Send { queue, body } => cmd_send(&engine, queue, body),
        Commands::Receive {
            queue,
            max,
            visibility_timeout,
        } => cmd_receive(
            &engine,
            queue,
            max.unwrap_or(config.receive.max_messages),
            visibility_timeout.unwrap_or(config.receive.visibility_timeout_secs),
        ),
    }

    Ok(())
}
