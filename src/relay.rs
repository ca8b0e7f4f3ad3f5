//! Minimal two-seat relay.
//!
//! Pairs two connections, tells each side who is present and forwards moves
//! and resets between them verbatim. It never looks inside a move: legality
//! is each client's business.

use log::{debug, info, warn};

use crate::common::Seat;
use crate::protocol::{ClientEvent, RosterPayload, ServerEvent};
use crate::readiness::Participant;
use crate::transport::RelayTransport;

/// What happened during a relayed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySummary {
    pub forwarded_moves: usize,
    pub resets: usize,
    /// Side whose connection failed first.
    pub disconnected: Seat,
}

pub struct Relay {
    white: RelayTransport,
    black: RelayTransport,
    white_name: Option<String>,
    black_name: Option<String>,
}

impl Relay {
    pub fn new(white: RelayTransport, black: RelayTransport) -> Self {
        Self {
            white,
            black,
            white_name: None,
            black_name: None,
        }
    }

    /// Relay until one side drops, then notify the other and return.
    pub async fn run(mut self) -> anyhow::Result<RelaySummary> {
        let mut forwarded_moves = 0;
        let mut resets = 0;
        loop {
            let (from, received) = tokio::select! {
                r = self.white.recv() => (Seat::White, r),
                r = self.black.recv() => (Seat::Black, r),
            };
            let event = match received {
                Ok(event) => event,
                Err(e) => {
                    info!("{} connection dropped: {}", from.label(), e);
                    if let Err(e) = self.side(from.other()).send(ServerEvent::PlayerDisconnected).await {
                        debug!("{} also unreachable: {}", from.other().label(), e);
                    }
                    return Ok(RelaySummary {
                        forwarded_moves,
                        resets,
                        disconnected: from,
                    });
                }
            };

            match event {
                ClientEvent::Username(name) => {
                    info!("{} joined as {:?}", from.label(), name);
                    match from {
                        Seat::White => self.white_name = Some(name),
                        Seat::Black => self.black_name = Some(name),
                    }
                    self.broadcast_roster().await;
                }
                ClientEvent::Move(payload) => {
                    debug!("Forwarding move from {} in room {}", from.label(), payload.room);
                    forwarded_moves += 1;
                    self.forward(from.other(), ServerEvent::Move(payload.mv)).await;
                }
                ClientEvent::GameReset(payload) => {
                    debug!("Forwarding reset from {} in room {}", from.label(), payload.room);
                    resets += 1;
                    self.forward(from.other(), ServerEvent::GameReset).await;
                }
            }
        }
    }

    fn side(&mut self, seat: Seat) -> &mut RelayTransport {
        match seat {
            Seat::White => &mut self.white,
            Seat::Black => &mut self.black,
        }
    }

    fn name(&self, seat: Seat) -> Option<&String> {
        match seat {
            Seat::White => self.white_name.as_ref(),
            Seat::Black => self.black_name.as_ref(),
        }
    }

    /// Roster as seen by `seat`: itself first, then the opponent if present.
    fn roster_for(&self, seat: Seat) -> Vec<Participant> {
        [seat, seat.other()]
            .into_iter()
            .filter_map(|s| self.name(s).map(|n| Participant::new(n.clone())))
            .collect()
    }

    async fn broadcast_roster(&mut self) {
        for seat in [Seat::White, Seat::Black] {
            if self.name(seat).is_none() {
                continue;
            }
            let players = self.roster_for(seat);
            self.forward(seat, ServerEvent::OpponentJoined(RosterPayload { players }))
                .await;
        }
    }

    /// Delivery failures surface on that side's next `recv`.
    async fn forward(&mut self, to: Seat, event: ServerEvent) {
        if let Err(e) = self.side(to).send(event).await {
            warn!("Failed to deliver to {}: {}", to.label(), e);
        }
    }
}
