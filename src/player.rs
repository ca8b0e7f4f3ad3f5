use tokio::sync::mpsc::UnboundedSender;

use crate::orchestrator::Notice;
use crate::player_node::LocalInput;
use crate::projection::Snapshot;

/// Front end driving one seat: a terminal, a bot or a test double.
///
/// The node hands every view and notice to the player and receives input back
/// through `input`. Implementations must not block; anything slow belongs on
/// its own thread or task.
pub trait Player: Send {
    /// Called after every processed event with the freshly projected view.
    fn on_view(&mut self, view: &Snapshot, input: &UnboundedSender<LocalInput>);

    /// A user-facing message raised by the orchestrator.
    fn on_notice(&mut self, _notice: &Notice) {}
}
