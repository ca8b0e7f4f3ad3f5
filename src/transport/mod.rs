use crate::protocol::{ClientEvent, ServerEvent};

/// Duplex event channel. `send` carries `S`, `recv` yields `R`.
///
/// `recv` must be cancellation safe: callers race it against local input in
/// `tokio::select!`.
#[async_trait::async_trait]
pub trait Transport<S, R>: Send
where
    S: Send + 'static,
    R: Send + 'static,
{
    async fn send(&mut self, msg: S) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<R>;
}

/// Client end: sends client events, receives relay events.
pub type ClientTransport = Box<dyn Transport<ClientEvent, ServerEvent>>;

/// Relay end of a single client connection.
pub type RelayTransport = Box<dyn Transport<ServerEvent, ClientEvent>>;

pub mod in_memory;
pub mod tcp;
