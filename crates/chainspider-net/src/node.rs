//! Peer connection lifecycle
//!
//! A [`Node`] is one peer endpoint plus its managed transport connection.
//! The connection opens lazily, supports reference-counted scoped
//! acquisition so nested callers share one physical stream, and carries a
//! level-triggered stop signal as the sole cancellation primitive.

use crate::addr::NodeAddr;
use crate::error::{NetError, NetResult};
use chainspider_wire::{ByteOrder, Record};
use bytes::Bytes;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// A chain-specific outbound message with a fixed wire form.
pub trait Message: Send + Sync {
    /// Serializes the message for the wire under `order`.
    fn to_wire(&self, order: ByteOrder) -> Bytes;
}

impl Message for Record {
    fn to_wire(&self, order: ByteOrder) -> Bytes {
        self.pack(order)
    }
}

macro_rules! packable_message {
    ($($name:ident),*) => {
        $(
            impl Message for chainspider_wire::$name {
                fn to_wire(&self, order: ByteOrder) -> Bytes {
                    chainspider_wire::Packable::pack(self, order)
                }
            }
        )*
    };
}

packable_message!(Int8, UInt8, Int16, UInt16, Int32, UInt32, Int64, UInt64);

/// Level-triggered stop signal.
///
/// Once set, every waiter returns promptly, including waits started after
/// the signal fired. Re-armed by [`Node::connect`].
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Sets the signal; persists until cleared.
    pub fn set(&self) {
        self.tx.send_replace(true);
    }

    fn clear(&self) {
        self.tx.send_replace(false);
    }

    /// True if the signal is currently set.
    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    /// Suspends until the signal is set; returns immediately if it already
    /// is.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so wait_for cannot fail
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

#[derive(Default)]
struct ConnState {
    /// Read half; taken by an active inbound stream task
    reader: Option<OwnedReadHalf>,
    /// Write half; presence defines "connected"
    writer: Option<OwnedWriteHalf>,
    /// Active scoped acquisitions
    entries: usize,
}

struct NodeShared {
    state: Mutex<ConnState>,
    stop: StopSignal,
}

/// A peer endpoint with a single managed transport connection.
///
/// Equality and hashing use only (address, port): two `Node`s for the same
/// endpoint are interchangeable in sets and maps regardless of connection
/// state. Cloning shares the underlying connection state.
#[derive(Clone)]
pub struct Node {
    addr: NodeAddr,
    port: u16,
    shared: Arc<NodeShared>,
}

impl Node {
    /// Creates a node for (address, port) without connecting.
    pub fn new(addr: impl Into<NodeAddr>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            shared: Arc::new(NodeShared {
                state: Mutex::new(ConnState::default()),
                stop: StopSignal::new(),
            }),
        }
    }

    /// Canonical peer address.
    pub fn addr(&self) -> NodeAddr {
        self.addr
    }

    /// Peer port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Socket address of the peer in IPv6 form.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V6(self.addr.ip()), self.port)
    }

    /// The node's stop signal.
    pub fn stop_signal(&self) -> &StopSignal {
        &self.shared.stop
    }

    /// Sets the stop signal. Level-triggered: current and future waiters
    /// observe termination immediately.
    pub fn terminate(&self) {
        self.shared.stop.set();
    }

    /// Suspends until the stop signal is set.
    pub async fn join(&self) {
        self.shared.stop.wait().await;
    }

    /// True if a connection is open.
    pub async fn is_connected(&self) -> bool {
        self.shared.state.lock().await.writer.is_some()
    }

    /// True if a connection is open and the stop signal is clear.
    pub async fn is_running(&self) -> bool {
        self.is_connected().await && !self.shared.stop.is_set()
    }

    /// Opens the connection; no-op when already connected.
    ///
    /// A refused direct attempt retries once against the embedded IPv4
    /// address when the node address is IPv4-mapped; any other failure
    /// propagates as [`NetError::ConnectionFailed`]. Success re-arms the
    /// stop signal.
    pub async fn connect(&self) -> NetResult<()> {
        let mut state = self.shared.state.lock().await;
        self.connect_locked(&mut state).await
    }

    async fn connect_locked(&self, state: &mut ConnState) -> NetResult<()> {
        if state.writer.is_some() {
            return Ok(());
        }
        let stream = self.open_stream().await?;
        let (reader, writer) = stream.into_split();
        state.reader = Some(reader);
        state.writer = Some(writer);
        self.shared.stop.clear();
        debug!(addr = %self.addr, port = self.port, "connected");
        Ok(())
    }

    async fn open_stream(&self) -> NetResult<TcpStream> {
        let failed = |source: io::Error| NetError::ConnectionFailed {
            addr: self.addr.ip(),
            port: self.port,
            source,
        };
        match TcpStream::connect(self.socket_addr()).await {
            Ok(stream) => Ok(stream),
            Err(err) if err.kind() == io::ErrorKind::ConnectionRefused => {
                // Is it an IPv4 address? If so, try connecting via that.
                match self.addr.ipv4_mapped() {
                    Some(v4) => {
                        debug!(addr = %self.addr, %v4, "refused, retrying over IPv4");
                        TcpStream::connect(SocketAddr::new(IpAddr::V4(v4), self.port))
                            .await
                            .map_err(failed)
                    }
                    None => Err(failed(err)),
                }
            }
            Err(err) => Err(failed(err)),
        }
    }

    /// Closes the connection and sets the stop signal; no-op when idle.
    ///
    /// Waits for the transport to release (flush + FIN) before returning.
    /// The node may be reconnected afterwards with clean state.
    pub async fn close(&self) -> NetResult<()> {
        let mut state = self.shared.state.lock().await;
        self.close_locked(&mut state).await
    }

    async fn close_locked(&self, state: &mut ConnState) -> NetResult<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.shutdown().await?;
            state.reader = None;
            self.shared.stop.set();
            debug!(addr = %self.addr, port = self.port, "disconnected");
        }
        Ok(())
    }

    /// Enters a connection scope.
    ///
    /// The outermost acquisition (entry count 0 to 1) opens the connection
    /// if none exists; nested acquisitions share it. The matching
    /// [`ConnectionGuard::release`] closes it again only when the count
    /// returns to zero, so the Nth nested user never tears down the
    /// connection opened by the first.
    pub async fn acquire(&self) -> NetResult<ConnectionGuard> {
        let mut state = self.shared.state.lock().await;
        state.entries += 1;
        if state.entries == 1 && state.writer.is_none() {
            if let Err(err) = self.connect_locked(&mut state).await {
                state.entries -= 1;
                return Err(err);
            }
        }
        Ok(ConnectionGuard {
            node: self.clone(),
            released: false,
        })
    }

    /// Writes `message` in network byte order and drains the transport
    /// before returning. Connects implicitly when idle.
    pub async fn send_message(&self, message: &impl Message) -> NetResult<()> {
        let data = message.to_wire(ByteOrder::Network);
        let mut state = self.shared.state.lock().await;
        self.connect_locked(&mut state).await?;
        let writer = state.writer.as_mut().ok_or(NetError::NotConnected)?;
        writer.write_all(&data).await?;
        writer.flush().await?;
        Ok(())
    }

    pub(crate) async fn take_reader(&self) -> NetResult<OwnedReadHalf> {
        let mut state = self.shared.state.lock().await;
        self.connect_locked(&mut state).await?;
        state.reader.take().ok_or(NetError::AlreadyRunning)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr && self.port == other.port
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node(address={}, port={})", self.addr, self.port)
    }
}

/// Scoped connection acquisition.
///
/// Obtained from [`Node::acquire`]; call [`release`](Self::release) to exit
/// the scope. Dropping a guard without releasing it decrements the entry
/// counter but cannot close the connection (closing suspends), so the
/// connection stays open until an explicit [`Node::close`].
#[must_use = "release this guard to close the scoped connection"]
pub struct ConnectionGuard {
    node: Node,
    released: bool,
}

impl ConnectionGuard {
    /// The node this guard holds open.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Exits the connection scope, closing the connection if this was the
    /// last active acquisition.
    pub async fn release(mut self) -> NetResult<()> {
        self.released = true;
        let mut state = self.node.shared.state.lock().await;
        state.entries -= 1;
        if state.entries == 0 {
            self.node.close_locked(&mut state).await?;
        }
        Ok(())
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self.node.shared.state.try_lock() {
            Ok(mut state) => {
                state.entries = state.entries.saturating_sub(1);
                if state.entries == 0 && state.writer.is_some() {
                    warn!(
                        addr = %self.node.addr,
                        port = self.node.port,
                        "connection guard dropped without release; connection left open"
                    );
                }
            }
            Err(_) => warn!(
                addr = %self.node.addr,
                port = self.node.port,
                "connection guard dropped without release while state was locked"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_endpoint_equality() {
        let a = Node::new("127.0.0.1".parse::<NodeAddr>().unwrap(), 8333);
        let b = Node::new("::ffff:127.0.0.1".parse::<NodeAddr>().unwrap(), 8333);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_port_not_equal() {
        let a = Node::new("127.0.0.1".parse::<NodeAddr>().unwrap(), 8333);
        let b = Node::new("127.0.0.1".parse::<NodeAddr>().unwrap(), 8334);
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_shows_endpoint_only() {
        let node = Node::new("10.0.0.1".parse::<NodeAddr>().unwrap(), 9999);
        let repr = format!("{:?}", node);
        assert!(repr.contains("::ffff:10.0.0.1"));
        assert!(repr.contains("9999"));
    }

    #[tokio::test]
    async fn test_stop_signal_level_triggered() {
        let signal = StopSignal::new();
        assert!(!signal.is_set());
        signal.set();
        assert!(signal.is_set());
        // A wait started after termination returns immediately
        signal.wait().await;
        signal.wait().await;
    }

    #[tokio::test]
    async fn test_terminate_wakes_join() {
        let node = Node::new("127.0.0.1".parse::<NodeAddr>().unwrap(), 1);
        let waiter = {
            let node = node.clone();
            tokio::spawn(async move { node.join().await })
        };
        node.terminate();
        waiter.await.unwrap();
        // Late joiners also return promptly
        node.join().await;
    }
}
