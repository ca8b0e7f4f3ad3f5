//! Rules oracle: legality, resulting position and move metadata.
//!
//! The orchestrator only talks to the [`RulesOracle`] trait so tests can drive
//! it with any position; [`ChessOracle`] is the standard-chess implementation
//! backed by `shakmaty`.

use std::collections::HashMap;

use anyhow::anyhow;
use serde::Serialize;
use shakmaty::{
    fen::{Epd, Fen},
    san::SanPlus,
    CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role,
};

use crate::common::{CandidateMove, Piece, PieceKind, Seat, Square};
use crate::config::{FIFTY_MOVE_HALFMOVES, REPETITION_LIMIT};

/// Match status derived from a position. Never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum MatchStatus {
    InProgress,
    /// Side to move is in check but has a reply.
    Check,
    Checkmate { winner: Seat },
    /// Stalemate, insufficient material, fifty-move rule or threefold repetition.
    Draw,
}

impl MatchStatus {
    /// Checkmate and draw end the match.
    pub const fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Checkmate { .. } | MatchStatus::Draw)
    }
}

/// Result record of a move the oracle accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// The move as played, promotion resolved.
    pub played: CandidateMove,
    /// Standard algebraic notation with check suffix, e.g. `Qxf7#`.
    pub notation: String,
    pub mover: Seat,
    pub captured: Option<PieceKind>,
    pub check: bool,
    pub checkmate: bool,
    pub draw: bool,
}

/// Legality and position capability consumed by the orchestrator.
///
/// Every call is synchronous. `apply` is the only mutating query and either
/// advances the position or leaves it untouched.
pub trait RulesOracle {
    /// Restore the starting configuration.
    fn reset(&mut self);

    /// Canonical serialization of the position (FEN).
    fn fen(&self) -> String;

    fn side_to_move(&self) -> Seat;

    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Destination squares of the piece on `from`; empty if none or no piece.
    fn legal_destinations(&self, from: Square) -> Vec<Square>;

    /// Every legal move for the side to move.
    fn legal_moves(&self) -> Vec<CandidateMove>;

    /// Play `candidate` if legal. `None` means rejected with no state change.
    fn apply(&mut self, candidate: &CandidateMove) -> Option<AppliedMove>;

    fn status(&self) -> MatchStatus;
}

/// Standard chess rules over a `shakmaty` position.
#[derive(Debug, Clone)]
pub struct ChessOracle {
    position: Chess,
    repetitions: HashMap<String, u32>,
}

impl Default for ChessOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessOracle {
    /// Oracle at the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// Oracle at an arbitrary position given as FEN.
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        let parsed: Fen = fen
            .parse()
            .map_err(|e| anyhow!("Invalid FEN {:?}: {}", fen, e))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| anyhow!("Illegal position {:?}: {}", fen, e))?;
        Ok(Self::from_position(position))
    }

    fn from_position(position: Chess) -> Self {
        let mut oracle = Self {
            position,
            repetitions: HashMap::new(),
        };
        oracle.record_position();
        oracle
    }

    /// Position identity for repetition counting: board, turn, castling and
    /// en passant, without the move counters.
    fn position_key(&self) -> String {
        Epd::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn record_position(&mut self) {
        *self.repetitions.entry(self.position_key()).or_insert(0) += 1;
    }

    /// Castling is addressed by the king's destination (`e1g1`), not the rook.
    fn destination(m: Move, turn: Color) -> Square {
        match m.castling_side() {
            Some(side) => side.king_to(turn),
            None => m.to(),
        }
    }

    fn find_move(&self, candidate: &CandidateMove) -> Option<Move> {
        let turn = self.position.turn();
        let promotion: Role = candidate.promotion.unwrap_or(PieceKind::Queen).into();
        self.position.legal_moves().into_iter().find(|m| {
            m.from() == Some(candidate.from)
                && Self::destination(*m, turn) == candidate.to
                && m.promotion().map_or(true, |role| role == promotion)
        })
    }

    fn is_repetition(&self) -> bool {
        self.repetitions
            .get(&self.position_key())
            .is_some_and(|count| *count >= REPETITION_LIMIT)
    }

    /// Any of the draw rules applies to the current position.
    pub fn is_draw(&self) -> bool {
        self.position.is_stalemate()
            || self.position.is_insufficient_material()
            || self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || self.is_repetition()
    }
}

impl RulesOracle for ChessOracle {
    fn reset(&mut self) {
        self.position = Chess::default();
        self.repetitions.clear();
        self.record_position();
    }

    fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn side_to_move(&self) -> Seat {
        self.position.turn().into()
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square).map(Piece::from)
    }

    fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let turn = self.position.turn();
        let mut destinations = Vec::new();
        for m in self.position.legal_moves() {
            if m.from() != Some(from) {
                continue;
            }
            // Promotions yield one move per piece kind on the same square.
            let to = Self::destination(m, turn);
            if !destinations.contains(&to) {
                destinations.push(to);
            }
        }
        destinations
    }

    fn legal_moves(&self) -> Vec<CandidateMove> {
        let turn = self.position.turn();
        self.position
            .legal_moves()
            .into_iter()
            .filter_map(|m| {
                Some(CandidateMove {
                    from: m.from()?,
                    to: Self::destination(m, turn),
                    promotion: m.promotion().map(PieceKind::from),
                })
            })
            .collect()
    }

    fn apply(&mut self, candidate: &CandidateMove) -> Option<AppliedMove> {
        let m = self.find_move(candidate)?;
        let mover = Seat::from(self.position.turn());
        let captured = m.capture().map(PieceKind::from);
        let played = CandidateMove {
            from: candidate.from,
            to: candidate.to,
            promotion: m.promotion().map(PieceKind::from),
        };
        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, m);
        self.record_position();
        Some(AppliedMove {
            played,
            notation: san.to_string(),
            mover,
            captured,
            check: self.position.is_check(),
            checkmate: self.position.is_checkmate(),
            draw: self.is_draw(),
        })
    }

    fn status(&self) -> MatchStatus {
        if self.position.is_checkmate() {
            MatchStatus::Checkmate {
                winner: Seat::from(self.position.turn()).other(),
            }
        } else if self.is_draw() {
            MatchStatus::Draw
        } else if self.position.is_check() {
            MatchStatus::Check
        } else {
            MatchStatus::InProgress
        }
    }
}
