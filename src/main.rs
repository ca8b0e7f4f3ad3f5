use chesslink::{
    init_logging, CliPlayer, ClientConfig, ClientEvent, ClientNode, InMemoryTransport, MatchStatus,
    NodeExit, Player, RandomPlayer, Relay, Seat, ServerEvent, Snapshot, TcpTransport,
    DEFAULT_BIND, DEFAULT_CONNECT, DEFAULT_ROOM,
};

use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Parser)]
enum Commands {
    /// Play two bots against each other through an in-process relay.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 300, help = "Stop after this many plies")]
        max_plies: usize,
        #[arg(long, help = "Print a JSON summary instead of text")]
        json: bool,
    },
    /// Relay games between pairs of clients. The first to connect plays White.
    Serve {
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: String,
    },
    /// Join a relay and play one seat.
    Join {
        #[arg(long, default_value = DEFAULT_CONNECT)]
        connect: String,
        #[arg(long, default_value = DEFAULT_ROOM)]
        room: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, help = "white or black")]
        seat: Seat,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Bot leaves after this many plies")]
        max_plies: Option<usize>,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn winner_name(view: &Snapshot) -> Option<&'static str> {
    match view.status {
        MatchStatus::Checkmate { winner } => Some(winner.name()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local {
            seed,
            max_plies,
            json,
        } => {
            if !json {
                println!("Starting local bot vs bot game...");
                if let Some(s) = seed {
                    println!("Using fixed seed: {} (game will be reproducible)", s);
                }
            }
            let white_bot = RandomPlayer::new(make_rng(seed)).with_max_plies(max_plies);
            let black_bot =
                RandomPlayer::new(make_rng(seed.map(|s| s.wrapping_add(1)))).with_max_plies(max_plies);

            let (white_client, white_relay) =
                InMemoryTransport::<ClientEvent, ServerEvent>::pair();
            let (black_client, black_relay) =
                InMemoryTransport::<ClientEvent, ServerEvent>::pair();
            let relay = Relay::new(Box::new(white_relay), Box::new(black_relay));

            let mut white = ClientNode::new(
                ClientConfig::new(DEFAULT_ROOM, Seat::White, "white-bot"),
                Box::new(white_bot),
                Box::new(white_client),
            );
            let mut black = ClientNode::new(
                ClientConfig::new(DEFAULT_ROOM, Seat::Black, "black-bot"),
                Box::new(black_bot),
                Box::new(black_client),
            );

            let white_future = async move {
                white.run().await?;
                Ok::<Snapshot, anyhow::Error>(white.snapshot())
            };
            let black_future = async move {
                black.run().await?;
                Ok::<Snapshot, anyhow::Error>(black.snapshot())
            };
            let (white_view, black_view, summary) =
                tokio::try_join!(white_future, black_future, relay.run())?;

            if json {
                let result = json!({
                    "fen": white_view.fen,
                    "plies": white_view.moves.len(),
                    "status": white_view.status,
                    "winner": winner_name(&white_view),
                    "moves": white_view.moves.iter().map(|m| m.notation.as_str()).collect::<Vec<_>>(),
                    "whiteScore": white_view.white_score,
                    "blackScore": white_view.black_score,
                    "forwarded": summary.forwarded_moves,
                    "inSync": white_view.fen == black_view.fen,
                });
                println!("{}", serde_json::to_string(&result)?);
            } else {
                for entry in &white_view.moves {
                    println!("{:>3}. {:<8} {}", entry.number, entry.notation, entry.player);
                }
                println!("Result: {}", white_view.status_text);
                println!("Final position: {}", white_view.fen);
            }
        }
        Commands::Serve { bind } => {
            println!("Starting relay at {}...", bind);
            let listener = TcpListener::bind(&bind).await?;
            loop {
                println!("Waiting for White to connect...");
                let (white_stream, white_addr) = listener.accept().await?;
                println!("White connected from {}", white_addr);
                println!("Waiting for Black to connect...");
                let (black_stream, black_addr) = listener.accept().await?;
                println!("Black connected from {}", black_addr);

                let relay = Relay::new(
                    Box::new(TcpTransport::<ServerEvent, ClientEvent>::new(white_stream)),
                    Box::new(TcpTransport::<ServerEvent, ClientEvent>::new(black_stream)),
                );
                tokio::spawn(async move {
                    match relay.run().await {
                        Ok(summary) => println!(
                            "Session ended: {} left after {} moves",
                            summary.disconnected, summary.forwarded_moves
                        ),
                        Err(e) => eprintln!("Session ended with an error: {}", e),
                    }
                });
            }
        }
        Commands::Join {
            connect,
            room,
            name,
            seat,
            player,
            seed,
            max_plies,
        } => {
            println!("Connecting to relay at {}...", connect);
            let transport = TcpTransport::<ClientEvent, ServerEvent>::connect(&connect).await?;
            println!("Connected successfully!");

            let player: Box<dyn Player> = match player {
                PlayerType::Human => Box::new(CliPlayer::new()),
                PlayerType::Ai => {
                    println!("AI player selected.");
                    let bot = RandomPlayer::new(make_rng(seed));
                    match max_plies {
                        Some(limit) => Box::new(bot.with_max_plies(limit)),
                        None => Box::new(bot),
                    }
                }
            };
            let mut node = ClientNode::new(
                ClientConfig::new(room, seat, name),
                player,
                Box::new(transport),
            );
            match node.run().await {
                Ok(NodeExit::Quit) => println!("Goodbye."),
                Ok(NodeExit::ConnectionLost) => println!("Connection to the relay was lost."),
                Err(e) => eprintln!("Game ended with an error: {}", e),
            }
        }
    }
    Ok(())
}
