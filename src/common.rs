//! Common types for the chess client: seats, pieces, candidate moves and the
//! error taxonomy shared by the orchestrator and the network layer.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

pub use shakmaty::Square;

/// A client's colour for the match. Assigned once at join time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    White,
    Black,
}

impl Seat {
    /// The opposing seat.
    pub const fn other(self) -> Seat {
        match self {
            Seat::White => Seat::Black,
            Seat::Black => Seat::White,
        }
    }

    /// Capitalised name used in move records and status text.
    pub const fn label(self) -> &'static str {
        match self {
            Seat::White => "White",
            Seat::Black => "Black",
        }
    }

    /// Lowercase name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Seat::White => "white",
            Seat::Black => "black",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Seat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Seat::White),
            "black" | "b" => Ok(Seat::Black),
            _ => Err(ParseError::Seat(s.to_string())),
        }
    }
}

impl From<shakmaty::Color> for Seat {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Seat::White,
            shakmaty::Color::Black => Seat::Black,
        }
    }
}

impl From<Seat> for shakmaty::Color {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::White => shakmaty::Color::White,
            Seat::Black => shakmaty::Color::Black,
        }
    }
}

/// Kind of a chess piece, independent of colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Standard material value. The king is worth nothing on the score sheet.
    pub const fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// Lowercase letter as used in FEN and on the wire (`q` for queen).
    pub const fn char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<PieceKind> {
        Some(match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        })
    }

    /// Unicode chess glyph for a piece of this kind owned by `seat`.
    pub const fn symbol(self, seat: Seat) -> char {
        match (seat, self) {
            (Seat::White, PieceKind::Pawn) => '♙',
            (Seat::White, PieceKind::Knight) => '♘',
            (Seat::White, PieceKind::Bishop) => '♗',
            (Seat::White, PieceKind::Rook) => '♖',
            (Seat::White, PieceKind::Queen) => '♕',
            (Seat::White, PieceKind::King) => '♔',
            (Seat::Black, PieceKind::Pawn) => '♟',
            (Seat::Black, PieceKind::Knight) => '♞',
            (Seat::Black, PieceKind::Bishop) => '♝',
            (Seat::Black, PieceKind::Rook) => '♜',
            (Seat::Black, PieceKind::Queen) => '♛',
            (Seat::Black, PieceKind::King) => '♚',
        }
    }
}

impl From<shakmaty::Role> for PieceKind {
    fn from(role: shakmaty::Role) -> Self {
        match role {
            shakmaty::Role::Pawn => PieceKind::Pawn,
            shakmaty::Role::Knight => PieceKind::Knight,
            shakmaty::Role::Bishop => PieceKind::Bishop,
            shakmaty::Role::Rook => PieceKind::Rook,
            shakmaty::Role::Queen => PieceKind::Queen,
            shakmaty::Role::King => PieceKind::King,
        }
    }
}

impl From<PieceKind> for shakmaty::Role {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => shakmaty::Role::Pawn,
            PieceKind::Knight => shakmaty::Role::Knight,
            PieceKind::Bishop => shakmaty::Role::Bishop,
            PieceKind::Rook => shakmaty::Role::Rook,
            PieceKind::Queen => shakmaty::Role::Queen,
            PieceKind::King => shakmaty::Role::King,
        }
    }
}

/// Occupant of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub seat: Seat,
}

impl From<shakmaty::Piece> for Piece {
    fn from(piece: shakmaty::Piece) -> Self {
        Piece {
            kind: piece.role.into(),
            seat: piece.color.into(),
        }
    }
}

/// A proposed move that has not been validated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl CandidateMove {
    /// Move with the default queen promotion attached, as produced by clicks.
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: Some(PieceKind::Queen),
        }
    }

    /// Parse long algebraic form such as `e2e4` or `e7e8q`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(ParseError::Move(text.to_string()));
        }
        let from = parse_square(&text[0..2])?;
        let to = parse_square(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            Some(ch) => Some(
                PieceKind::from_char(ch).ok_or_else(|| ParseError::Promotion(ch.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.char())?;
        }
        Ok(())
    }
}

/// Parse a lowercase algebraic square name.
pub fn parse_square(text: &str) -> Result<Square, ParseError> {
    text.trim()
        .to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| ParseError::Square(text.to_string()))
}

/// Errors raised while reading user or wire text into domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not a square name such as `e4`.
    Square(String),
    /// Not a promotion letter.
    Promotion(String),
    /// Not a long algebraic move.
    Move(String),
    /// Not a seat name.
    Seat(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Square(s) => write!(f, "Invalid square: {:?}", s),
            ParseError::Promotion(s) => write!(f, "Invalid promotion piece: {:?}", s),
            ParseError::Move(s) => write!(f, "Invalid move: {:?}", s),
            ParseError::Seat(s) => write!(f, "Invalid seat (expected white or black): {:?}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Why the match cannot accept moves yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum BlockingReason {
    /// Fewer than two participants have joined.
    AwaitingOpponent { joined: usize },
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockingReason::AwaitingOpponent { joined } => {
                write!(f, "Waiting for opponent to join... ({}/2 players)", joined)
            }
        }
    }
}

/// Failures of core operations. All are recoverable; none leave the
/// position, captured pieces and move log out of step with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Both seats are not occupied yet.
    NotReady(BlockingReason),
    /// Local seat tried to move while the opponent is to move.
    WrongTurn,
    /// The rules oracle rejected the candidate.
    IllegalMove(CandidateMove),
    /// The match reached checkmate or a draw.
    MatchOver,
    /// A remote move or reset failed validation and was dropped.
    RemoteProtocolViolation(String),
    /// The transport channel failed or disconnected.
    TransportFailure(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NotReady(reason) => write!(f, "Match not ready: {}", reason),
            MatchError::WrongTurn => write!(f, "It is not your turn"),
            MatchError::IllegalMove(mv) => write!(f, "Illegal move: {}", mv),
            MatchError::MatchOver => write!(f, "The match is over"),
            MatchError::RemoteProtocolViolation(why) => {
                write!(f, "Remote protocol violation: {}", why)
            }
            MatchError::TransportFailure(why) => write!(f, "Transport failure: {}", why),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<ParseError> for MatchError {
    fn from(err: ParseError) -> Self {
        MatchError::RemoteProtocolViolation(err.to_string())
    }
}
