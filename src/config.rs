use std::time::Duration;

use crate::common::Seat;

/// Number of seats a match needs before moves are accepted.
pub const SEATS_PER_MATCH: usize = 2;

/// Default address the relay listens on.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default address clients connect to.
pub const DEFAULT_CONNECT: &str = "127.0.0.1:8080";

/// Room identifier used when none is given.
pub const DEFAULT_ROOM: &str = "LOBBY";

/// Default timeout for a single network read or write.
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest frame accepted on the wire (64 KiB). Chess events are tiny.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// Remote moves held while the roster fills. Later ones are dropped.
pub const MAX_DEFERRED_MOVES: usize = 16;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of the same position that end the game as a draw.
pub const REPETITION_LIMIT: u32 = 3;

/// Environment variable that selects the log level.
pub const LOG_ENV: &str = "CHESSLINK_LOG";

/// Per-client match settings decided when joining a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub room: String,
    pub seat: Seat,
    pub username: String,
}

impl ClientConfig {
    pub fn new(room: impl Into<String>, seat: Seat, username: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            seat,
            username: username.into(),
        }
    }
}
