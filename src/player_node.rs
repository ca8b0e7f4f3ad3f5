use log::{debug, info};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::common::Square;
use crate::config::ClientConfig;
use crate::oracle::ChessOracle;
use crate::orchestrator::{MatchEvent, MoveOrchestrator};
use crate::player::Player;
use crate::projection::{Projection, Snapshot};
use crate::protocol::ClientEvent;
use crate::transport::ClientTransport;

/// Input from the local front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalInput {
    Click(Square),
    Reset,
    Quit,
}

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeExit {
    /// The player asked to leave.
    Quit,
    /// The transport failed; the last state is kept.
    ConnectionLost,
}

/// One client: orchestrator, transport and front end joined by a single
/// serialized event loop.
pub struct ClientNode {
    game: MoveOrchestrator<ChessOracle, UnboundedSender<ClientEvent>>,
    transport: ClientTransport,
    outbox: UnboundedReceiver<ClientEvent>,
    input_tx: UnboundedSender<LocalInput>,
    inputs: UnboundedReceiver<LocalInput>,
    player: Box<dyn Player>,
    username: String,
}

impl ClientNode {
    pub fn new(config: ClientConfig, player: Box<dyn Player>, transport: ClientTransport) -> Self {
        let (sink, outbox) = mpsc::unbounded_channel();
        let (input_tx, inputs) = mpsc::unbounded_channel();
        Self {
            game: MoveOrchestrator::new(config.room, config.seat, ChessOracle::new(), sink),
            transport,
            outbox,
            input_tx,
            inputs,
            player,
            username: config.username,
        }
    }

    /// Sender for feeding local input from outside the player.
    pub fn input_handle(&self) -> UnboundedSender<LocalInput> {
        self.input_tx.clone()
    }

    pub fn game(&self) -> &MoveOrchestrator<ChessOracle, UnboundedSender<ClientEvent>> {
        &self.game
    }

    pub fn snapshot(&self) -> Snapshot {
        Projection::new(&self.game).snapshot()
    }

    /// Announce ourselves, then process events one at a time until the player
    /// quits or the connection fails.
    pub async fn run(&mut self) -> anyhow::Result<NodeExit> {
        if let Err(e) = self
            .transport
            .send(ClientEvent::Username(self.username.clone()))
            .await
        {
            self.game.handle(MatchEvent::TransportLost(e.to_string()));
            self.present();
            return Ok(NodeExit::ConnectionLost);
        }
        info!("Joined room {} as {}", self.game.room(), self.game.seat());
        self.present();

        loop {
            let event = tokio::select! {
                input = self.inputs.recv() => match input {
                    Some(LocalInput::Click(square)) => MatchEvent::Click(square),
                    Some(LocalInput::Reset) => MatchEvent::LocalReset,
                    Some(LocalInput::Quit) | None => {
                        info!("Leaving room {}", self.game.room());
                        return Ok(NodeExit::Quit);
                    }
                },
                received = self.transport.recv() => match received {
                    Ok(event) => MatchEvent::Remote(event),
                    Err(e) => MatchEvent::TransportLost(e.to_string()),
                },
            };
            debug!("Handling {:?}", event);

            let mut lost = matches!(event, MatchEvent::TransportLost(_));
            self.game.handle(event);
            if !lost {
                if let Err(e) = self.flush().await {
                    self.game.handle(MatchEvent::TransportLost(e.to_string()));
                    lost = true;
                }
            }
            self.present();
            if lost {
                return Ok(NodeExit::ConnectionLost);
            }
        }
    }

    /// Send everything the orchestrator queued while handling the last event.
    async fn flush(&mut self) -> anyhow::Result<()> {
        while let Ok(event) = self.outbox.try_recv() {
            self.transport.send(event).await?;
        }
        Ok(())
    }

    fn present(&mut self) {
        for notice in self.game.take_notices() {
            self.player.on_notice(&notice);
        }
        let view = Projection::new(&self.game).snapshot();
        self.player.on_view(&view, &self.input_tx);
    }
}
