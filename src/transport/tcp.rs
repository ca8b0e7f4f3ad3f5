use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::{MAX_FRAME_SIZE, NETWORK_TIMEOUT};
use crate::transport::Transport;

/// Size of a single read from the socket.
const READ_CHUNK: usize = 4096;

/// Length-prefixed JSON frames over TCP: a 4-byte big-endian length followed
/// by the event body.
///
/// Partial frames are kept in an internal buffer, so a `recv` cancelled by
/// `tokio::select!` loses nothing.
pub struct TcpTransport<S, R> {
    stream: TcpStream,
    send_timeout: Duration,
    recv_timeout: Option<Duration>,
    max_frame_size: u32,
    read_buf: Vec<u8>,
    shutdown: Arc<AtomicBool>,
    _events: PhantomData<fn(S) -> R>,
}

impl<S, R> TcpTransport<S, R> {
    /// Wrap a connected stream. Receives wait indefinitely because a player
    /// may think for as long as they like.
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, NETWORK_TIMEOUT, None, MAX_FRAME_SIZE)
    }

    pub fn with_config(
        stream: TcpStream,
        send_timeout: Duration,
        recv_timeout: Option<Duration>,
        max_frame_size: u32,
    ) -> Self {
        Self {
            stream,
            send_timeout,
            recv_timeout,
            max_frame_size,
            read_buf: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            _events: PhantomData,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Request graceful shutdown of the transport.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Pop one complete frame body from the read buffer, if present.
    fn take_frame(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        if self.read_buf.len() < 4 {
            return Ok(None);
        }
        let len = u32::from_be_bytes([
            self.read_buf[0],
            self.read_buf[1],
            self.read_buf[2],
            self.read_buf[3],
        ]);
        if len > self.max_frame_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_frame_size
            ));
        }
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }
        let total = 4 + len as usize;
        if self.read_buf.len() < total {
            return Ok(None);
        }
        let body = self.read_buf[4..total].to_vec();
        self.read_buf.drain(..total);
        Ok(Some(body))
    }

    async fn fill_buf(&mut self) -> anyhow::Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        let read = self.stream.read(&mut chunk);
        let n = match self.recv_timeout {
            Some(limit) => timeout(limit, read)
                .await
                .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?,
            None => read.await,
        }
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionReset {
                anyhow::anyhow!("Connection reset by peer")
            } else {
                anyhow::anyhow!("Read error: {}", e)
            }
        })?;
        if n == 0 {
            return Err(anyhow::anyhow!("Connection closed by peer"));
        }
        self.read_buf.extend_from_slice(&chunk[..n]);
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S, R> Transport<S, R> for TcpTransport<S, R>
where
    S: Serialize + Send + 'static,
    R: DeserializeOwned + Send + 'static,
{
    async fn send(&mut self, msg: S) -> anyhow::Result<()> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }

        let data = serde_json::to_vec(&msg)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        if data.len() as u64 > u64::from(self.max_frame_size) {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_frame_size
            ));
        }

        let mut frame = Vec::with_capacity(4 + data.len());
        frame.extend_from_slice(&(data.len() as u32).to_be_bytes());
        frame.extend_from_slice(&data);

        timeout(self.send_timeout, self.stream.write_all(&frame))
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.send_timeout))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::ConnectionReset
                {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Write error: {}", e)
                }
            })
    }

    async fn recv(&mut self) -> anyhow::Result<R> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        loop {
            if let Some(body) = self.take_frame()? {
                return serde_json::from_slice(&body)
                    .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e));
            }
            self.fill_buf().await?;
        }
    }
}
