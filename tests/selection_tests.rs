use chesslink::{
    CandidateMove, ChessOracle, ClickOutcome, Highlight, PieceKind, RulesOracle, Seat,
    SelectionMachine, Square,
};

#[test]
fn selecting_a_knight_highlights_targets() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();

    assert_eq!(
        selection.click(Square::G1, Seat::White, &oracle),
        ClickOutcome::Selected(Square::G1)
    );
    let highlights = selection.highlights().unwrap();
    assert_eq!(highlights.len(), 3);
    assert_eq!(highlights[&Square::G1], Highlight::Selected);
    assert_eq!(highlights[&Square::F3], Highlight::EmptyTarget);
    assert_eq!(highlights[&Square::H3], Highlight::EmptyTarget);
}

#[test]
fn clicking_origin_again_deselects() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    selection.click(Square::E2, Seat::White, &oracle);
    assert_eq!(
        selection.click(Square::E2, Seat::White, &oracle),
        ClickOutcome::Deselected
    );
    assert!(selection.is_idle());
    assert!(selection.highlights().is_none());
}

#[test]
fn empty_or_enemy_squares_are_ignored_when_idle() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    assert_eq!(
        selection.click(Square::E4, Seat::White, &oracle),
        ClickOutcome::Ignored
    );
    assert_eq!(
        selection.click(Square::E7, Seat::White, &oracle),
        ClickOutcome::Ignored
    );
    assert!(selection.is_idle());
}

#[test]
fn blocked_piece_reports_no_moves() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    assert_eq!(
        selection.click(Square::A1, Seat::White, &oracle),
        ClickOutcome::NoLegalMoves(Square::A1)
    );
    assert!(selection.is_idle());
    assert!(selection.highlights().is_none());
}

#[test]
fn clicking_another_own_piece_reselects() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    selection.click(Square::E2, Seat::White, &oracle);
    assert_eq!(
        selection.click(Square::G1, Seat::White, &oracle),
        ClickOutcome::Selected(Square::G1)
    );
    assert_eq!(selection.selected(), Some(Square::G1));
    assert!(selection.destinations().contains(&Square::F3));
    assert!(!selection.destinations().contains(&Square::E4));
}

#[test]
fn clicking_elsewhere_deselects() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    selection.click(Square::E2, Seat::White, &oracle);
    assert_eq!(
        selection.click(Square::A5, Seat::White, &oracle),
        ClickOutcome::Deselected
    );
    assert!(selection.is_idle());
}

#[test]
fn destination_click_hands_off_a_queen_promotion_move() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    selection.click(Square::E2, Seat::White, &oracle);
    assert_eq!(
        selection.click(Square::E4, Seat::White, &oracle),
        ClickOutcome::Move(CandidateMove {
            from: Square::E2,
            to: Square::E4,
            promotion: Some(PieceKind::Queen),
        })
    );
    // Cleared eagerly, before the move is applied anywhere.
    assert!(selection.is_idle());
    assert_eq!(oracle.side_to_move(), Seat::White);
}

#[test]
fn capture_targets_are_marked() {
    let oracle =
        ChessOracle::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
            .unwrap();
    let mut selection = SelectionMachine::new();
    selection.click(Square::E4, Seat::White, &oracle);
    let highlights = selection.highlights().unwrap();
    assert_eq!(highlights[&Square::D5], Highlight::CaptureAvailable);
    assert_eq!(highlights[&Square::E5], Highlight::EmptyTarget);
}

#[test]
fn interrupt_clears_any_selection() {
    let oracle = ChessOracle::new();
    let mut selection = SelectionMachine::new();
    selection.click(Square::B1, Seat::White, &oracle);
    selection.interrupt();
    assert!(selection.is_idle());
    assert!(selection.destinations().is_empty());
}
