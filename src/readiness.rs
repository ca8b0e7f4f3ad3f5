//! Roster membership and the readiness gate derived from it.

use serde::{Deserialize, Serialize};

use crate::common::BlockingReason;
use crate::config::SEATS_PER_MATCH;

/// A joined participant as announced by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub username: String,
}

impl Participant {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Ordered list of joined participants, replaced wholesale by roster events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Participant>,
}

impl Roster {
    pub fn new(players: Vec<Participant>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[Participant] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.players.get(index)
    }

    /// Replace the roster; returns the readiness before and after the update.
    pub fn replace(&mut self, players: Vec<Participant>) -> (bool, bool) {
        let before = ReadinessGate::new(self).match_ready();
        self.players = players;
        (before, ReadinessGate::new(self).match_ready())
    }
}

/// Read-only view answering whether the match may proceed.
///
/// Borrowing the roster instead of caching a flag keeps readiness in step
/// with every roster update.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessGate<'a> {
    roster: &'a Roster,
}

impl<'a> ReadinessGate<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// True iff both seats are occupied.
    pub fn match_ready(&self) -> bool {
        self.roster.len() >= SEATS_PER_MATCH
    }

    /// Why moves are blocked, or `None` when ready.
    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        if self.match_ready() {
            None
        } else {
            Some(BlockingReason::AwaitingOpponent {
                joined: self.roster.len(),
            })
        }
    }

    /// Number of joined participants.
    pub fn joined(&self) -> usize {
        self.roster.len()
    }
}
