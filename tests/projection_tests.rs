use chesslink::{
    BlockingReason, CandidateMove, ChessOracle, ClientEvent, Highlight, MatchStatus,
    MoveOrchestrator, Participant, PieceKind, Projection, Seat, Square, WireMove,
};

type Game = MoveOrchestrator<ChessOracle, Vec<ClientEvent>>;

fn game(seat: Seat, players: &[&str]) -> Game {
    let mut game = MoveOrchestrator::new("ROOM7", seat, ChessOracle::new(), Vec::new());
    game.update_roster(players.iter().map(|p| Participant::new(*p)).collect());
    game
}

fn remote(game: &mut Game, text: &str) {
    let c = CandidateMove::parse(text).unwrap();
    game.apply_remote_move(&WireMove::from(&c));
}

fn local(game: &mut Game, text: &str) {
    game.attempt_local_move(CandidateMove::parse(text).unwrap())
        .unwrap();
}

#[test]
fn turn_labels_follow_the_position() {
    let mut g = game(Seat::Black, &["bob", "alice"]);
    assert_eq!(Projection::new(&g).current_turn_label(), "White");
    assert!(!Projection::new(&g).is_local_turn());

    remote(&mut g, "d2d4");
    let view = Projection::new(&g);
    assert_eq!(view.current_turn(), Seat::Black);
    assert!(view.is_local_turn());
}

#[test]
fn material_counts_captures_by_side() {
    let mut g = game(Seat::White, &["alice", "bob"]);
    local(&mut g, "e2e4");
    remote(&mut g, "d7d5");
    local(&mut g, "e4d5");
    remote(&mut g, "d8d5");
    local(&mut g, "b1c3");
    remote(&mut g, "d5c4");
    local(&mut g, "f1c4");

    let view = Projection::new(&g);
    // White took a pawn and the queen, Black a pawn.
    assert_eq!(view.material_score(Seat::White), 10);
    assert_eq!(view.material_score(Seat::Black), 1);
    assert_eq!(view.material_balance(), 9);
    assert_eq!(g.captured().white, vec![PieceKind::Pawn, PieceKind::Queen]);
}

#[test]
fn player_labels_use_roster_order() {
    let g = game(Seat::Black, &["bob", "alice"]);
    let view = Projection::new(&g);
    assert_eq!(view.player_label(Seat::Black), "bob");
    assert_eq!(view.player_label(Seat::White), "alice");

    let g = game(Seat::White, &["alice", "  "]);
    assert_eq!(Projection::new(&g).player_label(Seat::Black), "Anonymous");
}

#[test]
fn player_labels_while_waiting() {
    let g = game(Seat::White, &["alice"]);
    let view = Projection::new(&g);
    assert_eq!(view.player_label(Seat::White), "alice");
    assert_eq!(view.player_label(Seat::Black), "Waiting for player...");

    let g = game(Seat::White, &[]);
    assert_eq!(Projection::new(&g).player_label(Seat::White), "Unknown");
}

#[test]
fn square_styling_passes_selection_through() {
    let mut g = game(Seat::White, &["alice", "bob"]);
    assert!(Projection::new(&g).square_styling().is_empty());

    g.click(Square::B1).unwrap();
    let styling = Projection::new(&g).square_styling();
    assert_eq!(styling.get(&Square::B1), Some(&Highlight::Selected));
    assert_eq!(styling.get(&Square::C3), Some(&Highlight::EmptyTarget));

    g.click(Square::B1).unwrap();
    assert!(Projection::new(&g).square_styling().is_empty());
}

#[test]
fn status_text_variants() {
    let g = game(Seat::White, &["alice"]);
    assert_eq!(Projection::new(&g).status_text(), "Waiting");

    let mut g = game(Seat::White, &["alice", "bob"]);
    assert_eq!(Projection::new(&g).status_text(), "Active");
    local(&mut g, "e2e4");
    remote(&mut g, "f7f6");
    local(&mut g, "d1h5");
    assert_eq!(Projection::new(&g).status_text(), "Check");

    let mut g = game(Seat::White, &["alice", "bob"]);
    local(&mut g, "f2f3");
    remote(&mut g, "e7e5");
    local(&mut g, "g2g4");
    remote(&mut g, "d8h4");
    assert_eq!(Projection::new(&g).status_text(), "Checkmate! Black wins!");
}

#[test]
fn snapshot_carries_the_full_view() {
    let mut g = game(Seat::White, &["alice", "bob"]);
    local(&mut g, "e2e4");
    remote(&mut g, "d7d5");
    local(&mut g, "e4d5");
    g.click(Square::D8).ok();

    let snap = Projection::new(&g).snapshot();
    assert_eq!(snap.room, "ROOM7");
    assert_eq!(snap.seat, Seat::White);
    assert_eq!(snap.turn, Seat::Black);
    assert!(!snap.is_local_turn);
    assert!(snap.match_ready);
    assert_eq!(snap.blocking_reason, None);
    assert_eq!(snap.players_joined, 2);
    assert_eq!(snap.white_player, "alice");
    assert_eq!(snap.black_player, "bob");
    assert_eq!(snap.selected, None);
    assert_eq!(snap.status, MatchStatus::InProgress);
    assert_eq!(snap.captured_by_white, vec![PieceKind::Pawn]);
    assert_eq!(snap.white_score, 1);
    assert_eq!(snap.black_score, 0);

    let numbers: Vec<_> = snap.moves.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 1, 2]);
    assert_eq!(snap.moves[2].notation, "exd5");
    assert_eq!(snap.moves[2].player, "White");
    assert_eq!(snap.moves[2].captured, Some('♟'));
    assert_eq!(snap.moves[2].time.len(), 8);
}

#[test]
fn snapshot_serializes_camel_case() {
    let g = game(Seat::White, &["alice"]);
    let snap = Projection::new(&g).snapshot();
    assert_eq!(
        snap.blocking_reason,
        Some(BlockingReason::AwaitingOpponent { joined: 1 })
    );
    let value = serde_json::to_value(&snap).unwrap();
    assert_eq!(value["matchReady"], false);
    assert_eq!(value["playersJoined"], 1);
    assert_eq!(value["game"], 1);
    assert_eq!(value["statusText"], "Waiting");
    assert_eq!(value["blockingReason"]["reason"], "awaitingOpponent");
    assert_eq!(value["status"]["state"], "inProgress");
}
