//! tapcoind - TapCoin game node
//!
//! Wires the ledger engine to its front-ends: loads the snapshot, serves
//! the HTTP API, optionally runs an interactive chat session on stdin, and
//! snapshots the ledger on an interval and on shutdown.

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use owo_colors::OwoColorize;
use tapcoin_api::ApiState;
use tapcoin_bot::{BotConfig, BotService};
use tapcoin_core::{Ledger, UserId};
use tapcoin_storage::{LedgerSnapshot, Storage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "tapcoind")]
#[command(about = "TapCoin game node", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address override (host:port)
    #[arg(long)]
    listen: Option<String>,

    /// Data directory override
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Also run an interactive chat session on stdin
    #[arg(long)]
    chat: bool,

    /// User id for the interactive chat session
    #[arg(long, default_value_t = 1)]
    chat_user: UserId,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen))?;

    let storage = Arc::new(Storage::open(&config.storage.data_dir)?);
    let ledger = if storage.has_snapshot() {
        let snapshot = storage.load()?;
        info!(
            accounts = snapshot.accounts.len(),
            saved_at = %snapshot.saved_at,
            "loaded ledger snapshot"
        );
        Arc::new(Ledger::from_accounts(snapshot.accounts.into_values()))
    } else {
        info!("starting with an empty ledger");
        Arc::new(Ledger::new())
    };

    banner(&addr, ledger.len());

    let autosave = tokio::spawn(autosave_loop(
        Arc::clone(&ledger),
        Arc::clone(&storage),
        config.storage.autosave_secs,
    ));

    if cli.chat {
        let bot = BotService::new(
            Arc::clone(&ledger),
            BotConfig {
                admin_password: config.admin.password.clone(),
                owner_id: config.admin.owner_id,
            },
        );
        tokio::spawn(chat_session(bot, cli.chat_user));
    }

    let state = ApiState::new(Arc::clone(&ledger))
        .with_admin_token(config.admin.api_token.clone())
        .with_owner_token(config.admin.owner_api_token.clone());

    tokio::select! {
        result = tapcoin_api::start_server(addr, state) => {
            if let Err(e) = result {
                error!("API server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    autosave.abort();
    save_ledger(&ledger, &storage)?;
    info!("final snapshot written");

    Ok(())
}

fn banner(addr: &SocketAddr, accounts: usize) {
    println!("{}", "TapCoin node".cyan().bold());
    println!("  api:      http://{}", addr.yellow());
    println!("  accounts: {}", accounts.green());
}

fn save_ledger(ledger: &Ledger, storage: &Storage) -> anyhow::Result<()> {
    let snapshot = LedgerSnapshot::new(Utc::now(), ledger.export_accounts());
    storage.save(&snapshot).context("saving ledger snapshot")?;
    Ok(())
}

async fn autosave_loop(ledger: Arc<Ledger>, storage: Arc<Storage>, every_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(every_secs.max(1)));
    interval.tick().await; // first tick fires immediately
    loop {
        interval.tick().await;
        match save_ledger(&ledger, &storage) {
            Ok(()) => info!(accounts = ledger.len(), "ledger snapshot saved"),
            Err(e) => warn!("autosave failed: {}", e),
        }
    }
}

/// Minimal local chat transport: one user, lines on stdin
async fn chat_session(bot: BotService, user_id: UserId) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let reply = bot.handle_message(user_id, "/start", Utc::now());
    print_reply(&reply);

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let reply = bot.handle_message(user_id, &line, Utc::now());
        print_reply(&reply);
    }
}

fn print_reply(reply: &tapcoin_bot::Reply) {
    println!("{}", reply.text);
    if let Some(keyboard) = &reply.keyboard {
        for row in keyboard {
            let row: Vec<String> = row.iter().map(|b| format!("[{}]", b)).collect();
            println!("{}", row.join(" ").dimmed());
        }
    }
    println!();
}
