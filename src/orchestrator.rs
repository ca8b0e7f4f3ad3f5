//! Move orchestrator: the single authority over the local board.
//!
//! Every mutation of the position goes through [`MoveOrchestrator`]. A move is
//! applied through the rules oracle and, only if accepted, the move log,
//! captured pieces and selection advance with it. Remote input is validated
//! the same way but failures are logged and dropped instead of surfaced.

use std::collections::VecDeque;

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::common::{BlockingReason, CandidateMove, MatchError, PieceKind, Seat, Square};
use crate::config::MAX_DEFERRED_MOVES;
use crate::oracle::{AppliedMove, MatchStatus, RulesOracle};
use crate::protocol::{ClientEvent, ServerEvent, WireMove};
use crate::readiness::{Participant, ReadinessGate, Roster};
use crate::selection::{ClickOutcome, SelectionMachine};

/// Outbound half of the transport channel as seen by the orchestrator.
pub trait EventSink {
    fn emit(&mut self, event: ClientEvent);
}

impl EventSink for Vec<ClientEvent> {
    fn emit(&mut self, event: ClientEvent) {
        self.push(event);
    }
}

impl EventSink for UnboundedSender<ClientEvent> {
    fn emit(&mut self, event: ClientEvent) {
        if let Err(e) = self.send(event) {
            warn!("Dropping outbound event, channel closed: {:?}", e.0);
        }
    }
}

/// Where a reset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

/// One applied ply. Appended once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    #[serde(rename = "move")]
    pub notation: String,
    pub player: Seat,
    pub time: String,
    pub captured: Option<PieceKind>,
}

impl MoveRecord {
    fn from_applied(applied: &AppliedMove) -> Self {
        Self {
            notation: applied.notation.clone(),
            player: applied.mover,
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            captured: applied.captured,
        }
    }
}

/// Move number of the ply at `index` in the log (two plies per move).
pub const fn move_number(index: usize) -> usize {
    index / 2 + 1
}

/// Pieces removed from the board, keyed by the side that captured them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapturedSets {
    pub white: Vec<PieceKind>,
    pub black: Vec<PieceKind>,
}

impl CapturedSets {
    /// Pieces captured by `seat`.
    pub fn by(&self, seat: Seat) -> &[PieceKind] {
        match seat {
            Seat::White => &self.white,
            Seat::Black => &self.black,
        }
    }

    fn push(&mut self, capturer: Seat, kind: PieceKind) {
        match capturer {
            Seat::White => self.white.push(kind),
            Seat::Black => self.black.push(kind),
        }
    }

    fn clear(&mut self) {
        self.white.clear();
        self.black.clear();
    }
}

/// Title of the notice raised when the opponent's connection drops.
pub const PLAYER_DISCONNECTED: &str = "Player Disconnected";
/// Title of the notice raised when our own connection fails.
pub const CONNECTION_LOST: &str = "Connection Lost";

/// User-facing message, presented as a dialog by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// What became of a remote move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Applied(AppliedMove),
    /// Held until the roster reports both seats.
    Deferred,
    /// Failed validation; logged only.
    Discarded(MatchError),
}

/// Input to the per-match event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    Click(Square),
    LocalReset,
    Remote(ServerEvent),
    TransportLost(String),
}

/// Owner of the position and of all state derived from it.
pub struct MoveOrchestrator<O: RulesOracle, S: EventSink> {
    oracle: O,
    sink: S,
    room: String,
    seat: Seat,
    roster: Roster,
    selection: SelectionMachine,
    history: Vec<MoveRecord>,
    captured: CapturedSets,
    deferred: VecDeque<CandidateMove>,
    notices: Vec<Notice>,
    game_number: u32,
}

impl<O: RulesOracle, S: EventSink> MoveOrchestrator<O, S> {
    pub fn new(room: impl Into<String>, seat: Seat, oracle: O, sink: S) -> Self {
        Self {
            oracle,
            sink,
            room: room.into(),
            seat,
            roster: Roster::default(),
            selection: SelectionMachine::new(),
            history: Vec::new(),
            captured: CapturedSets::default(),
            deferred: VecDeque::new(),
            notices: Vec::new(),
            game_number: 1,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn fen(&self) -> String {
        self.oracle.fen()
    }

    pub fn side_to_move(&self) -> Seat {
        self.oracle.side_to_move()
    }

    /// Recomputed from the position on every call.
    pub fn status(&self) -> MatchStatus {
        self.oracle.status()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn gate(&self) -> ReadinessGate<'_> {
        ReadinessGate::new(&self.roster)
    }

    pub fn is_ready(&self) -> bool {
        self.gate().match_ready()
    }

    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        self.gate().blocking_reason()
    }

    pub fn selection(&self) -> &SelectionMachine {
        &self.selection
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn captured(&self) -> &CapturedSets {
        &self.captured
    }

    /// Games played in this session, counting the current one. Bumped by every reset.
    pub fn game_number(&self) -> u32 {
        self.game_number
    }

    /// Remote moves waiting for the match to become ready.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand pending notices to the presenter.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, title: &str, message: impl Into<String>) {
        self.notices.push(Notice::new(title, message));
    }

    /// Dispatch one event. Every input to a match flows through here.
    pub fn handle(&mut self, event: MatchEvent) {
        match event {
            MatchEvent::Click(square) => {
                let _ = self.click(square);
            }
            MatchEvent::LocalReset => {
                if self.is_ready() {
                    self.reset_match(Origin::Local);
                } else {
                    self.notify(
                        "Game Not Ready",
                        "Please wait for your opponent to join before starting a new game.",
                    );
                }
            }
            MatchEvent::Remote(ServerEvent::Move(wire)) => {
                self.apply_remote_move(&wire);
            }
            MatchEvent::Remote(ServerEvent::GameReset) => self.reset_match(Origin::Remote),
            MatchEvent::Remote(ServerEvent::OpponentJoined(payload)) => {
                self.update_roster(payload.players)
            }
            MatchEvent::Remote(ServerEvent::PlayerDisconnected) => self.peer_disconnected(),
            MatchEvent::TransportLost(reason) => {
                self.transport_lost(&reason);
            }
        }
    }

    /// Route a square click through the readiness and turn checks into the
    /// selection machine, submitting the move when a destination is confirmed.
    pub fn click(&mut self, square: Square) -> Result<ClickOutcome, MatchError> {
        if let Some(reason) = self.blocking_reason() {
            self.notify(
                "Game Not Ready",
                "Please wait for your opponent to join before making moves.",
            );
            return Err(MatchError::NotReady(reason));
        }
        if self.status().is_terminal() {
            return Err(MatchError::MatchOver);
        }
        if self.oracle.side_to_move() != self.seat {
            self.notify("Not Your Turn", "Please wait for your opponent to move.");
            return Err(MatchError::WrongTurn);
        }

        let outcome = self.selection.click(square, self.seat, &self.oracle);
        debug!("Click on {}: {:?}", square, outcome);
        match outcome {
            ClickOutcome::NoLegalMoves(_) => {
                self.notify("No Moves", "This piece has no legal moves available.");
            }
            ClickOutcome::Move(candidate) => {
                // Rejections raise their own notice.
                let _ = self.attempt_local_move(candidate);
            }
            ClickOutcome::Ignored | ClickOutcome::Selected(_) | ClickOutcome::Deselected => {}
        }
        Ok(outcome)
    }

    /// Validate and apply a locally originated move, then send it to the peer.
    pub fn attempt_local_move(
        &mut self,
        candidate: CandidateMove,
    ) -> Result<AppliedMove, MatchError> {
        if let Some(reason) = self.blocking_reason() {
            self.notify(
                "Game Not Ready",
                "Please wait for your opponent to join the game before making moves.",
            );
            return Err(MatchError::NotReady(reason));
        }
        if self.status().is_terminal() {
            self.notify("Game Over", "Start a new game to keep playing.");
            return Err(MatchError::MatchOver);
        }
        if self.oracle.side_to_move() != self.seat {
            self.notify("Invalid Move", "It is not your turn!");
            return Err(MatchError::WrongTurn);
        }
        let Some(applied) = self.oracle.apply(&candidate) else {
            self.notify("Invalid Move", "That move is not legal!");
            return Err(MatchError::IllegalMove(candidate));
        };

        info!("Local move {} ({})", applied.notation, candidate);
        self.commit(&applied);
        self.sink.emit(ClientEvent::mv(&candidate, &self.room));
        self.announce_status();
        Ok(applied)
    }

    /// Apply a move delivered by the peer. Parse or legality failures are
    /// dropped without a notice.
    pub fn apply_remote_move(&mut self, wire: &WireMove) -> RemoteOutcome {
        match CandidateMove::try_from(wire) {
            Ok(candidate) => self.apply_remote_candidate(candidate),
            Err(e) => {
                warn!("Discarding malformed remote move {:?}: {}", wire, e);
                RemoteOutcome::Discarded(e.into())
            }
        }
    }

    fn apply_remote_candidate(&mut self, candidate: CandidateMove) -> RemoteOutcome {
        if !self.is_ready() {
            if self.deferred.len() >= MAX_DEFERRED_MOVES {
                warn!(
                    "Dropping remote move {}: {} moves already waiting for the match",
                    candidate,
                    self.deferred.len()
                );
                return RemoteOutcome::Discarded(MatchError::RemoteProtocolViolation(format!(
                    "too many early moves, dropped {}",
                    candidate
                )));
            }
            debug!("Deferring remote move {} until the match is ready", candidate);
            self.deferred.push_back(candidate);
            return RemoteOutcome::Deferred;
        }
        if self.status().is_terminal() {
            warn!("Discarding remote move {} after the match ended", candidate);
            return RemoteOutcome::Discarded(MatchError::MatchOver);
        }
        if self.oracle.side_to_move() == self.seat {
            warn!(
                "Discarding remote move {} played on the {} side's turn",
                candidate,
                self.seat.label()
            );
            return RemoteOutcome::Discarded(MatchError::RemoteProtocolViolation(format!(
                "move {} out of turn",
                candidate
            )));
        }
        let Some(applied) = self.oracle.apply(&candidate) else {
            warn!(
                "Discarding illegal remote move {} in position {}",
                candidate,
                self.oracle.fen()
            );
            return RemoteOutcome::Discarded(MatchError::RemoteProtocolViolation(format!(
                "illegal move {}",
                candidate
            )));
        };

        info!("Remote move {} ({})", applied.notation, candidate);
        self.commit(&applied);
        self.announce_status();
        RemoteOutcome::Applied(applied)
    }

    /// Back to the starting position with empty log and captures. Local resets
    /// are announced to the peer; remote ones are not echoed.
    pub fn reset_match(&mut self, origin: Origin) {
        self.oracle.reset();
        self.history.clear();
        self.captured.clear();
        self.deferred.clear();
        self.selection.interrupt();
        self.game_number += 1;
        match origin {
            Origin::Local => {
                info!("Match reset locally");
                self.sink.emit(ClientEvent::reset(&self.room));
            }
            Origin::Remote => {
                info!("Match reset by opponent");
                self.notify("Game Reset", "Your opponent has reset the game.");
            }
        }
    }

    /// Replace the roster. Moves deferred while waiting are applied in arrival
    /// order once both seats are filled.
    pub fn update_roster(&mut self, players: Vec<Participant>) {
        let (was_ready, ready) = self.roster.replace(players);
        debug!("Roster now has {} player(s)", self.roster.len());
        if ready && !was_ready {
            info!("Both players present, match ready");
            while let Some(candidate) = self.deferred.pop_front() {
                self.apply_remote_candidate(candidate);
            }
        } else if was_ready && !ready {
            info!("Waiting for second player to join");
        }
    }

    pub fn peer_disconnected(&mut self) {
        info!("Opponent disconnected");
        self.notify(
            PLAYER_DISCONNECTED,
            "Your opponent has disconnected. You can wait for them to reconnect or start a new game.",
        );
    }

    /// Record a failed channel. Position and log stay as they were.
    pub fn transport_lost(&mut self, reason: &str) -> MatchError {
        let failure = MatchError::TransportFailure(reason.to_string());
        error!("{}", failure);
        self.notify(CONNECTION_LOST, format!("Connection to the server failed: {}", reason));
        failure
    }

    fn commit(&mut self, applied: &AppliedMove) {
        self.history.push(MoveRecord::from_applied(applied));
        if let Some(kind) = applied.captured {
            self.captured.push(applied.mover, kind);
        }
        self.selection.interrupt();
    }

    fn announce_status(&mut self) {
        match self.status() {
            MatchStatus::Checkmate { winner } => {
                let text = format!("Checkmate! {} wins!", winner.label());
                info!("{}", text);
                self.notify("Game Over", text);
            }
            MatchStatus::Draw => {
                info!("Draw");
                self.notify("Game Over", "The game ended in a draw.");
            }
            MatchStatus::Check => {
                let checked = self.oracle.side_to_move().label();
                self.notify("Check!", format!("{} king is in check!", checked));
            }
            MatchStatus::InProgress => {}
        }
    }
}
