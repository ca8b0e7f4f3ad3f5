//! Presentation projection: view facts derived from orchestrator state.
//!
//! Nothing here owns state. Everything is recomputed from the orchestrator
//! whenever a view is requested.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::{BlockingReason, PieceKind, Seat, Square};
use crate::config::SEATS_PER_MATCH;
use crate::oracle::{MatchStatus, RulesOracle};
use crate::orchestrator::{move_number, EventSink, MoveOrchestrator};
use crate::selection::{Highlight, HighlightMap};

/// Name shown when a seat's participant has no usable name.
pub const ANONYMOUS: &str = "Anonymous";
/// Name shown for a seat that nobody occupies yet.
pub const WAITING_LABEL: &str = "Waiting for player...";
/// Name shown for the local seat before the relay has listed us.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Read-only projection over a match.
pub struct Projection<'a, O: RulesOracle, S: EventSink> {
    game: &'a MoveOrchestrator<O, S>,
}

impl<'a, O: RulesOracle, S: EventSink> Projection<'a, O, S> {
    pub fn new(game: &'a MoveOrchestrator<O, S>) -> Self {
        Self { game }
    }

    pub fn current_turn(&self) -> Seat {
        self.game.side_to_move()
    }

    /// "White" or "Black".
    pub fn current_turn_label(&self) -> &'static str {
        self.current_turn().label()
    }

    pub fn is_local_turn(&self) -> bool {
        self.current_turn() == self.game.seat()
    }

    /// Material gained by `side`: value of the pieces it has captured.
    pub fn material_score(&self, side: Seat) -> u32 {
        self.game
            .captured()
            .by(side)
            .iter()
            .map(|kind| kind.value())
            .sum()
    }

    /// White's material minus Black's.
    pub fn material_balance(&self) -> i64 {
        i64::from(self.material_score(Seat::White)) - i64::from(self.material_score(Seat::Black))
    }

    /// Display name for `side`. The local seat is roster entry 0 and the
    /// opponent entry 1.
    pub fn player_label(&self, side: Seat) -> String {
        let roster = self.game.roster();
        let local = side == self.game.seat();
        if roster.len() < SEATS_PER_MATCH {
            return match roster.get(0) {
                _ if !local => WAITING_LABEL.to_string(),
                Some(p) if !p.username.trim().is_empty() => p.username.trim().to_string(),
                _ => UNKNOWN_LABEL.to_string(),
            };
        }
        let index = if local { 0 } else { 1 };
        roster
            .get(index)
            .map(|p| p.username.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string()
    }

    /// Highlight map of the current selection; empty when idle.
    pub fn square_styling(&self) -> HighlightMap {
        self.game.selection().highlights().cloned().unwrap_or_default()
    }

    pub fn status_text(&self) -> String {
        match self.game.status() {
            MatchStatus::Checkmate { winner } => format!("Checkmate! {} wins!", winner.label()),
            MatchStatus::Draw => "Draw".to_string(),
            _ if !self.game.is_ready() => "Waiting".to_string(),
            MatchStatus::Check => "Check".to_string(),
            MatchStatus::InProgress => "Active".to_string(),
        }
    }

    /// Full view for the renderer.
    pub fn snapshot(&self) -> Snapshot {
        let game = self.game;
        let moves = game
            .history()
            .iter()
            .enumerate()
            .map(|(index, record)| LogEntry {
                number: move_number(index),
                notation: record.notation.clone(),
                player: record.player.label(),
                time: record.time.clone(),
                captured: record.captured.map(|kind| kind.symbol(record.player.other())),
            })
            .collect();
        Snapshot {
            fen: game.fen(),
            game: game.game_number(),
            seat: game.seat(),
            room: game.room().to_string(),
            turn: self.current_turn(),
            is_local_turn: self.is_local_turn(),
            match_ready: game.is_ready(),
            blocking_reason: game.blocking_reason(),
            players_joined: game.gate().joined(),
            white_player: self.player_label(Seat::White),
            black_player: self.player_label(Seat::Black),
            selected: game.selection().selected().map(|sq| sq.to_string()),
            destinations: game.selection().destinations().len(),
            highlights: self
                .square_styling()
                .into_iter()
                .map(|(sq, style)| (sq.to_string(), style))
                .collect(),
            status: game.status(),
            status_text: self.status_text(),
            moves,
            captured_by_white: game.captured().white.clone(),
            captured_by_black: game.captured().black.clone(),
            white_score: self.material_score(Seat::White),
            black_score: self.material_score(Seat::Black),
        }
    }
}

/// One line of the move log as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub number: usize,
    #[serde(rename = "move")]
    pub notation: String,
    pub player: &'static str,
    pub time: String,
    /// Glyph of the captured piece.
    pub captured: Option<char>,
}

/// Everything a renderer needs, recomputed after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub fen: String,
    /// Starts at 1 and increases with every reset.
    pub game: u32,
    pub seat: Seat,
    pub room: String,
    pub turn: Seat,
    pub is_local_turn: bool,
    pub match_ready: bool,
    pub blocking_reason: Option<BlockingReason>,
    pub players_joined: usize,
    pub white_player: String,
    pub black_player: String,
    pub selected: Option<String>,
    pub destinations: usize,
    pub highlights: BTreeMap<String, Highlight>,
    pub status: MatchStatus,
    pub status_text: String,
    pub moves: Vec<LogEntry>,
    pub captured_by_white: Vec<PieceKind>,
    pub captured_by_black: Vec<PieceKind>,
    pub white_score: u32,
    pub black_score: u32,
}

impl Snapshot {
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Highlight of `square` in this view.
    pub fn highlight(&self, square: Square) -> Option<Highlight> {
        self.highlights.get(&square.to_string()).copied()
    }
}
