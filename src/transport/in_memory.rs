use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::Transport;

/// In-process transport backed by a pair of tokio channels.
pub struct InMemoryTransport<S, R> {
    tx: UnboundedSender<S>,
    rx: UnboundedReceiver<R>,
}

impl<S, R> InMemoryTransport<S, R> {
    /// Two connected ends; what one sends the other receives.
    pub fn pair() -> (Self, InMemoryTransport<R, S>) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (
            Self { tx: tx1, rx: rx2 },
            InMemoryTransport { tx: tx2, rx: rx1 },
        )
    }
}

#[async_trait::async_trait]
impl<S, R> Transport<S, R> for InMemoryTransport<S, R>
where
    S: Send + 'static,
    R: Send + 'static,
{
    async fn send(&mut self, msg: S) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn recv(&mut self) -> anyhow::Result<R> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}
