//! Click-to-move selection state machine.
//!
//! Tracks the locally selected square and its legal destinations and derives
//! the highlight map the board renderer consumes. Readiness and turn checks
//! happen in the orchestrator before clicks reach this machine.

use std::collections::BTreeMap;
use std::mem;

use serde::Serialize;

use crate::common::{CandidateMove, Seat, Square};
use crate::oracle::RulesOracle;

/// Styling of a highlighted square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Highlight {
    /// Origin of the current selection.
    Selected,
    /// Legal destination occupied by an enemy piece.
    CaptureAvailable,
    /// Legal destination on an empty square.
    EmptyTarget,
}

pub type HighlightMap = BTreeMap<Square, Highlight>;

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    PieceSelected {
        origin: Square,
        destinations: Vec<Square>,
        highlights: HighlightMap,
    },
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing selectable was clicked.
    Ignored,
    /// A piece was selected (or re-selected).
    Selected(Square),
    /// The selection was cleared.
    Deselected,
    /// The clicked piece has no legal move; selection stays cleared.
    NoLegalMoves(Square),
    /// A destination was confirmed; the move goes to the orchestrator.
    Move(CandidateMove),
}

/// Selection state machine for the local seat.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: Selection,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Selection::Idle)
    }

    /// Selected square, if any.
    pub fn selected(&self) -> Option<Square> {
        match &self.state {
            Selection::Idle => None,
            Selection::PieceSelected { origin, .. } => Some(*origin),
        }
    }

    /// Legal destinations of the selected piece; empty when idle.
    pub fn destinations(&self) -> &[Square] {
        match &self.state {
            Selection::Idle => &[],
            Selection::PieceSelected { destinations, .. } => destinations,
        }
    }

    /// Highlight map for rendering; `None` when idle.
    pub fn highlights(&self) -> Option<&HighlightMap> {
        match &self.state {
            Selection::Idle => None,
            Selection::PieceSelected { highlights, .. } => Some(highlights),
        }
    }

    /// Unconditional return to `Idle` after an external position change.
    pub fn interrupt(&mut self) {
        self.state = Selection::Idle;
    }

    /// Process a click on `square` by the player sitting at `seat`.
    pub fn click<O: RulesOracle + ?Sized>(
        &mut self,
        square: Square,
        seat: Seat,
        oracle: &O,
    ) -> ClickOutcome {
        match mem::take(&mut self.state) {
            Selection::Idle => self.select(square, seat, oracle),
            Selection::PieceSelected { origin, .. } if origin == square => ClickOutcome::Deselected,
            Selection::PieceSelected {
                origin,
                destinations,
                ..
            } if destinations.contains(&square) => {
                // Cleared eagerly whatever the orchestrator decides.
                ClickOutcome::Move(CandidateMove::new(origin, square))
            }
            Selection::PieceSelected { .. } => {
                if owns(oracle, square, seat) {
                    self.select(square, seat, oracle)
                } else {
                    ClickOutcome::Deselected
                }
            }
        }
    }

    fn select<O: RulesOracle + ?Sized>(
        &mut self,
        square: Square,
        seat: Seat,
        oracle: &O,
    ) -> ClickOutcome {
        if !owns(oracle, square, seat) {
            return ClickOutcome::Ignored;
        }
        let destinations = oracle.legal_destinations(square);
        if destinations.is_empty() {
            return ClickOutcome::NoLegalMoves(square);
        }

        let mut highlights = HighlightMap::new();
        highlights.insert(square, Highlight::Selected);
        for dest in &destinations {
            let style = match oracle.piece_at(*dest) {
                Some(piece) if piece.seat != seat => Highlight::CaptureAvailable,
                _ => Highlight::EmptyTarget,
            };
            highlights.insert(*dest, style);
        }
        self.state = Selection::PieceSelected {
            origin: square,
            destinations,
            highlights,
        };
        ClickOutcome::Selected(square)
    }
}

fn owns<O: RulesOracle + ?Sized>(oracle: &O, square: Square, seat: Seat) -> bool {
    oracle.piece_at(square).is_some_and(|piece| piece.seat == seat)
}
