use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use tokio::sync::mpsc::UnboundedSender;

use crate::oracle::{ChessOracle, RulesOracle};
use crate::orchestrator::{Notice, CONNECTION_LOST, PLAYER_DISCONNECTED};
use crate::player::Player;
use crate::player_node::LocalInput;
use crate::projection::Snapshot;

/// Bot that plays a uniformly random legal move whenever it is its turn.
///
/// It plays through the same click path as a human: origin square, then
/// destination. It quits once the game is over, the opponent or the
/// connection is gone, or `max_plies` plies have been played.
pub struct RandomPlayer {
    rng: SmallRng,
    max_plies: Option<usize>,
    /// Game number and ply at which the last move was submitted.
    acted_at: Option<(u32, usize)>,
    opponent_gone: bool,
    quit: bool,
}

impl RandomPlayer {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            rng,
            max_plies: None,
            acted_at: None,
            opponent_gone: false,
            quit: false,
        }
    }

    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = Some(max_plies);
        self
    }

    fn should_quit(&self, view: &Snapshot) -> bool {
        view.is_over()
            || self.opponent_gone
            || self.max_plies.is_some_and(|limit| view.moves.len() >= limit)
    }
}

impl Player for RandomPlayer {
    fn on_view(&mut self, view: &Snapshot, input: &UnboundedSender<LocalInput>) {
        if self.quit {
            return;
        }
        if self.should_quit(view) {
            debug!("Bot ({}) leaving after {} plies", view.seat, view.moves.len());
            self.quit = true;
            let _ = input.send(LocalInput::Quit);
            return;
        }
        let turn = (view.game, view.moves.len());
        if !view.match_ready || !view.is_local_turn || self.acted_at == Some(turn) {
            return;
        }

        let oracle = match ChessOracle::from_fen(&view.fen) {
            Ok(oracle) => oracle,
            Err(e) => {
                warn!("Bot cannot read the board: {}", e);
                return;
            }
        };
        let moves = oracle.legal_moves();
        let Some(choice) = moves.choose(&mut self.rng) else {
            return;
        };
        debug!("Bot ({}) plays {}", view.seat, choice);
        self.acted_at = Some(turn);
        let _ = input.send(LocalInput::Click(choice.from));
        let _ = input.send(LocalInput::Click(choice.to));
    }

    fn on_notice(&mut self, notice: &Notice) {
        if notice.title == PLAYER_DISCONNECTED || notice.title == CONNECTION_LOST {
            self.opponent_gone = true;
        }
    }
}
