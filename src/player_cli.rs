use std::io::{self, BufRead};
use std::sync::{Arc, Mutex};

use shakmaty::{File, Rank};
use tokio::sync::mpsc::UnboundedSender;

use crate::common::{parse_square, CandidateMove, Square};
use crate::oracle::{ChessOracle, RulesOracle};
use crate::orchestrator::Notice;
use crate::player::Player;
use crate::player_node::LocalInput;
use crate::projection::Snapshot;
use crate::selection::Highlight;

/// Interactive terminal player. Squares are typed one per line (`e2`, then
/// `e4`), or a whole move at once (`e2e4`). `reset` and `quit` do what they
/// say.
pub struct CliPlayer {
    reader_started: bool,
    last_view: Option<Snapshot>,
    /// Square selected in the latest view, read by the stdin thread.
    selected: Arc<Mutex<Option<Square>>>,
}

impl CliPlayer {
    pub fn new() -> Self {
        Self {
            reader_started: false,
            last_view: None,
            selected: Arc::new(Mutex::new(None)),
        }
    }

    fn start_reader(&mut self, input: &UnboundedSender<LocalInput>) {
        if self.reader_started {
            return;
        }
        self.reader_started = true;
        let input = input.clone();
        let selected = Arc::clone(&self.selected);
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let origin = selected.lock().ok().and_then(|guard| *guard);
                let parsed = parse_command(&line, origin);
                if parsed.is_empty() {
                    println!("Type a square (e2), a move (e2e4), reset or quit");
                }
                for cmd in parsed {
                    if input.send(cmd).is_err() {
                        return;
                    }
                }
            }
            let _ = input.send(LocalInput::Quit);
        });
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn one line of user input into local input events. A full move whose
/// origin is already `selected` only clicks the destination.
pub fn parse_command(line: &str, selected: Option<Square>) -> Vec<LocalInput> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "reset" | "new" => vec![LocalInput::Reset],
        "quit" | "exit" | "q" => vec![LocalInput::Quit],
        _ => {
            if let Ok(square) = parse_square(&line) {
                vec![LocalInput::Click(square)]
            } else if let Ok(mv) = CandidateMove::parse(&line) {
                if selected == Some(mv.from) {
                    vec![LocalInput::Click(mv.to)]
                } else {
                    vec![LocalInput::Click(mv.from), LocalInput::Click(mv.to)]
                }
            } else {
                Vec::new()
            }
        }
    }
}

/// Render the board for `view`, rank 8 on top. Selected and target squares are
/// bracketed.
pub fn render_board(view: &Snapshot) -> String {
    let oracle = match ChessOracle::from_fen(&view.fen) {
        Ok(oracle) => oracle,
        Err(e) => return format!("<unreadable board: {}>", e),
    };
    let mut out = String::new();
    for rank in Rank::ALL.iter().rev() {
        out.push_str(&format!("{} ", rank.char()));
        for file in File::ALL {
            let square = Square::from_coords(file, *rank);
            let glyph = oracle
                .piece_at(square)
                .map(|piece| piece.kind.symbol(piece.seat))
                .unwrap_or('.');
            let cell = match view.highlight(square) {
                Some(Highlight::Selected) => format!("({})", glyph),
                Some(Highlight::CaptureAvailable) => format!("[{}]", glyph),
                Some(Highlight::EmptyTarget) => " * ".to_string(),
                None => format!(" {} ", glyph),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for file in File::ALL {
        out.push_str(&format!(" {} ", file.char()));
    }
    out.push('\n');
    out
}

impl Player for CliPlayer {
    fn on_view(&mut self, view: &Snapshot, input: &UnboundedSender<LocalInput>) {
        self.start_reader(input);
        if let Ok(mut selected) = self.selected.lock() {
            *selected = view.selected.as_deref().and_then(|sq| parse_square(sq).ok());
        }
        if self.last_view.as_ref() == Some(view) {
            return;
        }

        println!();
        println!("{} (White) vs {} (Black)", view.white_player, view.black_player);
        print!("{}", render_board(view));
        println!(
            "Status: {}   Material: White {} / Black {}",
            view.status_text, view.white_score, view.black_score
        );
        if let Some(last) = view.moves.last() {
            println!("Last move: {}. {} ({}) at {}", last.number, last.notation, last.player, last.time);
        }
        if let Some(reason) = &view.blocking_reason {
            println!("{}", reason);
        } else if view.is_over() {
            println!("Type reset for a new game or quit to leave.");
        } else if view.is_local_turn {
            match &view.selected {
                Some(origin) => println!("{} selected, choose a destination", origin),
                None => println!("Your move ({})", view.turn),
            }
        } else {
            println!("Waiting for {} to move...", view.turn);
        }
        self.last_view = Some(view.clone());
    }

    fn on_notice(&mut self, notice: &Notice) {
        println!("*** {}: {} ***", notice.title, notice.message);
    }
}
