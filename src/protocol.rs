//! Wire events exchanged with the relay.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`. Event
//! names are the interop contract with the other client and must not change.

use serde::{Deserialize, Serialize};

use crate::common::{parse_square, CandidateMove, ParseError, PieceKind};
use crate::readiness::Participant;

/// Move descriptor as it travels on the wire: `{from, to, promotion}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl From<&CandidateMove> for WireMove {
    fn from(mv: &CandidateMove) -> Self {
        Self {
            from: mv.from.to_string(),
            to: mv.to.to_string(),
            promotion: mv.promotion.map(|kind| kind.char().to_string()),
        }
    }
}

impl TryFrom<&WireMove> for CandidateMove {
    type Error = ParseError;

    fn try_from(wire: &WireMove) -> Result<Self, Self::Error> {
        let promotion = match wire.promotion.as_deref() {
            None | Some("") => None,
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next().and_then(PieceKind::from_char), chars.next()) {
                    (Some(kind), None) => Some(kind),
                    _ => return Err(ParseError::Promotion(text.to_string())),
                }
            }
        };
        Ok(CandidateMove {
            from: parse_square(&wire.from)?,
            to: parse_square(&wire.to)?,
            promotion,
        })
    }
}

/// Payload of a roster update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPayload {
    #[serde(default)]
    pub players: Vec<Participant>,
}

/// Outbound move payload: the move plus the room it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    #[serde(rename = "move")]
    pub mv: WireMove,
    pub room: String,
}

/// Outbound reset payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPayload {
    pub room: String,
}

/// Events the relay delivers to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// The opponent's move.
    Move(WireMove),
    /// The opponent reset the board.
    GameReset,
    /// Roster changed; replaces the local roster.
    OpponentJoined(RosterPayload),
    /// The opponent's connection dropped.
    PlayerDisconnected,
}

/// Events a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Announce the display name once after connecting.
    Username(String),
    Move(MovePayload),
    GameReset(RoomPayload),
}

impl ClientEvent {
    pub fn mv(mv: &CandidateMove, room: &str) -> Self {
        ClientEvent::Move(MovePayload {
            mv: WireMove::from(mv),
            room: room.to_string(),
        })
    }

    pub fn reset(room: &str) -> Self {
        ClientEvent::GameReset(RoomPayload {
            room: room.to_string(),
        })
    }
}
