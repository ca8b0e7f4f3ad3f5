use chesslink::transport::in_memory::InMemoryTransport;
use chesslink::transport::tcp::TcpTransport;
use chesslink::{
    CandidateMove, ClientConfig, ClientEvent, ClientNode, MatchStatus, RandomPlayer,
    Relay, RosterPayload, Seat, ServerEvent, Snapshot, Square, Transport, WireMove,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;

fn names(event: ServerEvent) -> Vec<String> {
    match event {
        ServerEvent::OpponentJoined(RosterPayload { players }) => {
            players.into_iter().map(|p| p.username).collect()
        }
        other => panic!("expected roster, got {:?}", other),
    }
}

#[tokio::test]
async fn relay_pairs_forwards_and_reports_disconnect() -> anyhow::Result<()> {
    let (mut white, white_end) = InMemoryTransport::<ClientEvent, ServerEvent>::pair();
    let (mut black, black_end) = InMemoryTransport::<ClientEvent, ServerEvent>::pair();
    let relay = tokio::spawn(Relay::new(Box::new(white_end), Box::new(black_end)).run());

    white.send(ClientEvent::Username("alice".into())).await?;
    assert_eq!(names(white.recv().await?), vec!["alice"]);

    black.send(ClientEvent::Username("bob".into())).await?;
    assert_eq!(names(white.recv().await?), vec!["alice", "bob"]);
    assert_eq!(names(black.recv().await?), vec!["bob", "alice"]);

    let e4 = CandidateMove::new(Square::E2, Square::E4);
    white.send(ClientEvent::mv(&e4, "ROOM1")).await?;
    assert_eq!(black.recv().await?, ServerEvent::Move(WireMove::from(&e4)));

    black.send(ClientEvent::reset("ROOM1")).await?;
    assert_eq!(white.recv().await?, ServerEvent::GameReset);

    drop(black);
    assert_eq!(white.recv().await?, ServerEvent::PlayerDisconnected);

    let summary = relay.await??;
    assert_eq!(summary.forwarded_moves, 1);
    assert_eq!(summary.resets, 1);
    assert_eq!(summary.disconnected, Seat::Black);
    Ok(())
}

async fn bot_game(seed: u64, max_plies: usize) -> anyhow::Result<(Snapshot, Snapshot)> {
    let (white_client, white_end) = InMemoryTransport::<ClientEvent, ServerEvent>::pair();
    let (black_client, black_end) = InMemoryTransport::<ClientEvent, ServerEvent>::pair();
    let relay = Relay::new(Box::new(white_end), Box::new(black_end));

    let mut white = ClientNode::new(
        ClientConfig::new("ROOM1", Seat::White, "white-bot"),
        Box::new(RandomPlayer::new(SmallRng::seed_from_u64(seed)).with_max_plies(max_plies)),
        Box::new(white_client),
    );
    let mut black = ClientNode::new(
        ClientConfig::new("ROOM1", Seat::Black, "black-bot"),
        Box::new(RandomPlayer::new(SmallRng::seed_from_u64(seed + 1)).with_max_plies(max_plies)),
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
    let (white_view, black_view, _) = tokio::try_join!(white_future, black_future, relay.run())?;
    Ok((white_view, black_view))
}

#[tokio::test]
async fn seeded_bots_stay_in_sync() -> anyhow::Result<()> {
    for seed in [1, 7, 42] {
        let (white, black) = bot_game(seed, 120).await?;
        assert_eq!(white.fen, black.fen);
        assert_eq!(white.moves.len(), black.moves.len());
        let white_log: Vec<_> = white.moves.iter().map(|m| &m.notation).collect();
        let black_log: Vec<_> = black.moves.iter().map(|m| &m.notation).collect();
        assert_eq!(white_log, black_log);
        assert!(white.is_over() || white.moves.len() == 120);
        assert_eq!(white.white_score, black.white_score);
        assert_eq!(white.black_score, black.black_score);
    }
    Ok(())
}

#[tokio::test]
async fn bots_finish_a_game() -> anyhow::Result<()> {
    // Without a useful ply limit random play ends in mate or a draw.
    let (white, black) = bot_game(3, 5000).await?;
    assert!(white.is_over());
    assert_eq!(white.status, black.status);
    if let MatchStatus::Checkmate { winner } = white.status {
        assert_eq!(white.status_text, format!("Checkmate! {} wins!", winner));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn bots_play_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (white, _) = listener.accept().await?;
        let (black, _) = listener.accept().await?;
        Relay::new(
            Box::new(TcpTransport::<ServerEvent, ClientEvent>::new(white)),
            Box::new(TcpTransport::<ServerEvent, ClientEvent>::new(black)),
        )
        .run()
        .await
    });

    let white_transport = TcpTransport::<ClientEvent, ServerEvent>::connect(addr).await?;
    let black_transport = TcpTransport::<ClientEvent, ServerEvent>::connect(addr).await?;
    let mut white = ClientNode::new(
        ClientConfig::new("ROOM1", Seat::White, "alice"),
        Box::new(RandomPlayer::new(SmallRng::seed_from_u64(11)).with_max_plies(40)),
        Box::new(white_transport),
    );
    let mut black = ClientNode::new(
        ClientConfig::new("ROOM1", Seat::Black, "bob"),
        Box::new(RandomPlayer::new(SmallRng::seed_from_u64(12)).with_max_plies(40)),
        Box::new(black_transport),
    );

    let white_task = tokio::spawn(async move {
        white.run().await?;
        Ok::<Snapshot, anyhow::Error>(white.snapshot())
    });
    let black_task = tokio::spawn(async move {
        black.run().await?;
        Ok::<Snapshot, anyhow::Error>(black.snapshot())
    });
    let white_view = white_task.await??;
    let black_view = black_task.await??;
    server.await??;

    assert_eq!(white_view.fen, black_view.fen);
    assert_eq!(white_view.white_player, "alice");
    assert_eq!(white_view.black_player, "bob");
    assert_eq!(black_view.white_player, "alice");
    assert!(white_view.is_over() || white_view.moves.len() == 40);
    Ok(())
}
