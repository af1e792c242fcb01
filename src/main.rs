#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use reversi_client::{
    autopilot, cli, init_logging, AckMode, AiPlayer, AutopilotOptions, ClientConfig, ClientNode,
    Strategy, WsConnector,
};

#[cfg(feature = "std")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "std")]
use log::info;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::{Rng, SeedableRng};
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum AckModeArg {
    /// Wait for the server to confirm logins and queue joins.
    Confirmed,
    /// Assume requests succeed as soon as they are sent.
    Optimistic,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum StrategyArg {
    Random,
    Greedy,
}

#[derive(Args, Clone, Debug)]
#[cfg(feature = "std")]
struct ConnectArgs {
    #[arg(
        long,
        help = "Server URL (defaults to $REVERSI_SERVER_URL, then ws://localhost:8080/ws)"
    )]
    url: Option<String>,
    #[arg(long, help = "Log in automatically with this name")]
    username: Option<String>,
    #[arg(long, default_value_t = 5, help = "Heartbeat interval in seconds (0 disables)")]
    heartbeat_secs: u64,
    #[arg(long, default_value_t = 10)]
    connect_timeout_secs: u64,
    #[arg(long, help = "Reconnect after this many seconds when the connection drops")]
    reconnect_secs: Option<u64>,
    #[arg(long, value_enum, default_value_t = AckModeArg::Confirmed)]
    ack_mode: AckModeArg,
}

#[cfg(feature = "std")]
impl ConnectArgs {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env()
            .with_heartbeat_interval(Duration::from_secs(self.heartbeat_secs))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_reconnect_delay(self.reconnect_secs.map(Duration::from_secs))
            .with_username(self.username.clone())
            .with_ack_mode(match self.ack_mode {
                AckModeArg::Confirmed => AckMode::Confirmed,
                AckModeArg::Optimistic => AckMode::Optimistic,
            });
        if let Some(url) = &self.url {
            config = config.with_server_url(url.clone());
        }
        config
    }
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play interactively from the terminal.
    Play {
        #[command(flatten)]
        connect: ConnectArgs,
    },
    /// Let a computer player log in, queue and play games.
    Bot {
        #[command(flatten)]
        connect: ConnectArgs,
        #[arg(long, value_enum, default_value_t = StrategyArg::Greedy)]
        strategy: StrategyArg,
        #[arg(long, help = "Fix RNG seed for reproducible move choices (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Stop after this many games (default: play forever)")]
        games: Option<usize>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { connect } => play(connect.config()).await,
        Commands::Bot {
            connect,
            strategy,
            seed,
            games,
        } => {
            let mut rng = if let Some(s) = seed {
                SmallRng::seed_from_u64(s)
            } else {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            };
            let mut config = connect.config();
            let username = config
                .username
                .clone()
                .unwrap_or_else(|| format!("bot-{}", rng.random_range(1000..10000)));
            config.username = Some(username.clone());
            let strategy = match strategy {
                StrategyArg::Random => Strategy::Random,
                StrategyArg::Greedy => Strategy::Greedy,
            };
            let options = AutopilotOptions::new(username)
                .with_games(games)
                .with_stop_on_disconnect(config.reconnect_delay.is_none());

            let connector = WsConnector::new(config.server_url.clone());
            let (node, handle) = ClientNode::new(config, connector);
            let node_task = tokio::spawn(node.run());
            let played = autopilot(handle.clone(), AiPlayer::new(strategy), rng, options).await;
            handle.shutdown();
            node_task.await??;
            let played = played?;
            println!("Played {} game(s).", played);
            Ok(())
        }
    }
}

#[cfg(feature = "std")]
async fn play(config: ClientConfig) -> anyhow::Result<()> {
    println!("Connecting to {}...", config.server_url);
    println!("{}", cli::HELP);

    let connector = WsConnector::new(config.server_url.clone());
    let (node, handle) = ClientNode::new(config, connector);
    let node_task = tokio::spawn(node.run());

    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                print!("{}", cli::render(&snapshot));
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match cli::parse_command(&line) {
                    Ok(cli::Command::Quit) => break,
                    Ok(cli::Command::Help) => println!("{}", cli::HELP),
                    Ok(cli::Command::Board) => print!("{}", cli::render(&handle.snapshot())),
                    Ok(cmd) => {
                        if let Some(intent) = cmd.intent() {
                            if let Err(e) = handle.submit(intent).await {
                                println!("! {}", e);
                            }
                        }
                    }
                    Err(e) => println!("! {}", e),
                }
            }
        }
    }

    info!("shutting down");
    handle.shutdown();
    node_task.await??;
    Ok(())
}
