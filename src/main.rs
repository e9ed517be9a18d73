use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use concierge_gateway::db::{self, ConversationRepo};
use concierge_gateway::{ApiServerBuilder, Concierge, ConciergeClient, Config};

/// Concierge - voice concierge backend for a hotel front desk
#[derive(Parser)]
#[command(name = "concierge", version, about)]
struct Cli {
    /// Port to listen on (overrides `CONCIERGE_PORT` and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Data directory holding the conversation log
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one utterance locally, without the server or the log
    Ask {
        /// What the guest said
        text: String,
    },
    /// Chat with a running gateway, one line per utterance
    Chat {
        /// Assistant endpoint URL
        #[arg(long, default_value = "http://127.0.0.1:8787/api/assistant")]
        url: String,
        /// Bearer token sent with each request
        #[arg(long, env = "CONCIERGE_CLIENT_TOKEN")]
        token: Option<String>,
    },
    /// List sessions in the conversation log
    Sessions,
    /// Show the logged exchanges of one session
    History {
        /// Session identifier
        #[arg(short, long)]
        session: String,
        /// Maximum number of exchanges
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,concierge_gateway=info",
        1 => "info,concierge_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.api_server.port = port;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { text } => {
                cmd_ask(&config, &text);
                Ok(())
            }
            Command::Chat { url, token } => cmd_chat(url, token).await,
            Command::Sessions => cmd_sessions(&config),
            Command::History { session, limit } => cmd_history(&config, &session, limit),
        };
    }

    tracing::info!(
        port = config.api_server.port,
        data_dir = %config.data_dir.display(),
        hotel = %config.hotel.name,
        "starting concierge gateway"
    );
    tracing::debug!(?config, "loaded configuration");

    let pool = db::init(config.db_path())?;
    let concierge = Arc::new(Concierge::new(config.hotel.clone(), &config.custom_rules));

    if config.api_server.api_key.is_none() {
        tracing::warn!("CONCIERGE_API_KEY not set - admin endpoints are unauthenticated");
    }

    let server = ApiServerBuilder::new(pool, concierge)
        .server_config(&config.api_server)
        .build();

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}

/// Classify and answer one utterance offline
fn cmd_ask(config: &Config, text: &str) {
    let concierge = Concierge::new(config.hotel.clone(), &config.custom_rules);
    let reply = concierge.respond(text);
    println!("[{}] {}", reply.intent, reply.text);
}

/// Text chat against a running gateway
async fn cmd_chat(url: String, token: Option<String>) -> anyhow::Result<()> {
    let mut client = ConciergeClient::new(url, token)?;
    println!("Session {}", client.transcript().session_id());
    println!("Type a message and press enter. Ctrl-D to quit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("guest> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if let Some(reply) = client.send(line.trim_end()).await {
            println!("concierge> {reply}\n");
        }
    }

    println!("\n{} turns in this session", client.transcript().messages().len());
    Ok(())
}

/// List sessions in the log
fn cmd_sessions(config: &Config) -> anyhow::Result<()> {
    let Some(pool) = db::open_existing(config.db_path())? else {
        println!("No conversations logged yet");
        return Ok(());
    };
    let sessions = ConversationRepo::new(pool).list_sessions()?;

    if sessions.is_empty() {
        println!("No conversations logged yet");
        return Ok(());
    }

    for s in sessions {
        println!(
            "{}  {:>4} turns  {} .. {}",
            s.session_id,
            s.turns,
            s.first_at.format("%Y-%m-%d %H:%M:%S"),
            s.last_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    Ok(())
}

/// Print one session's exchanges
fn cmd_history(config: &Config, session_id: &str, limit: usize) -> anyhow::Result<()> {
    let Some(pool) = db::open_existing(config.db_path())? else {
        println!("No conversations logged yet");
        return Ok(());
    };
    let turns = ConversationRepo::new(pool).list_for_session(session_id, limit)?;

    if turns.is_empty() {
        anyhow::bail!("no conversations logged for session {session_id}");
    }

    for turn in turns {
        println!("{} [{}]", turn.created_at.format("%H:%M:%S"), turn.intent);
        println!("  guest:     {}", turn.user_message);
        println!("  concierge: {}", turn.bot_response);
    }

    Ok(())
}
