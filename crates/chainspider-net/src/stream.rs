//! Inbound message streaming
//!
//! [`Node::run`] spawns a reader task that feeds socket bytes through a
//! [`Decoder`] and yields decoded messages over a bounded channel, giving
//! consumers a lazy, backpressured sequence. The task races every read
//! against the node's stop signal and leaves the connection idle when the
//! stream ends, whether by cancellation, peer close, or error.

use crate::error::{NetError, NetResult};
use crate::node::Node;
use bytes::BytesMut;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::codec::Decoder;
use tracing::{debug, warn};

const READ_CHUNK: usize = 8 * 1024;
const CHANNEL_DEPTH: usize = 16;

/// Lazy sequence of decoded inbound messages from one [`Node`].
///
/// A decode or IO failure is yielded as an `Err` item before the stream
/// terminates.
pub struct MessageStream<M> {
    rx: mpsc::Receiver<NetResult<M>>,
}

impl<M> MessageStream<M> {
    /// Waits for the next message; `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<NetResult<M>> {
        self.rx.recv().await
    }
}

impl<M> Stream for MessageStream<M> {
    type Item = NetResult<M>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Node {
    /// Starts consuming the connection as a decoded message stream.
    ///
    /// Connects implicitly when idle. The stream honors the stop signal:
    /// after [`terminate`](Node::terminate) it stops yielding promptly. On
    /// exhaustion or cancellation the connection is closed and the node
    /// returns to the idle state.
    pub fn run<D>(&self, decoder: D) -> MessageStream<D::Item>
    where
        D: Decoder<Error = NetError> + Send + 'static,
        D::Item: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
        let node = self.clone();
        tokio::spawn(async move {
            if let Err(err) = node.read_loop(decoder, &tx).await {
                let _ = tx.send(Err(err)).await;
            }
            if let Err(err) = node.close().await {
                warn!(node = ?node, "close after stream end failed: {}", err);
            }
            debug!(node = ?node, "inbound stream ended");
        });
        MessageStream { rx }
    }

    async fn read_loop<D>(
        &self,
        mut decoder: D,
        tx: &mpsc::Sender<NetResult<D::Item>>,
    ) -> NetResult<()>
    where
        D: Decoder<Error = NetError>,
    {
        let mut reader = self.take_reader().await?;
        let stop = self.stop_signal().clone();
        let mut buf = BytesMut::with_capacity(READ_CHUNK);

        loop {
            // Drain complete frames before reading more
            while let Some(message) = decoder.decode(&mut buf)? {
                if tx.send(Ok(message)).await.is_err() {
                    // Consumer dropped the stream
                    return Ok(());
                }
            }

            tokio::select! {
                _ = stop.wait() => return Ok(()),
                read = reader.read_buf(&mut buf) => {
                    if read? == 0 {
                        // Peer closed; flush whatever the decoder can still
                        // produce from the remaining bytes
                        while let Some(message) = decoder.decode_eof(&mut buf)? {
                            if tx.send(Ok(message)).await.is_err() {
                                return Ok(());
                            }
                        }
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;
    use chainspider_wire::{ByteOrder, Packable, UInt16};

    /// Test decoder: consecutive big-endian u16 frames.
    struct U16Decoder;

    impl Decoder for U16Decoder {
        type Item = u16;
        type Error = NetError;

        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<u16>, NetError> {
            if src.len() < 2 {
                return Ok(None);
            }
            let value = UInt16::unpack(&src[..2], ByteOrder::Network)?;
            src.advance(2);
            Ok(Some(value.get()))
        }
    }

    #[tokio::test]
    async fn test_stream_yields_decoded_frames() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            tokio::io::AsyncWriteExt::write_all(&mut sock, &[0x01, 0x2c, 0x00, 0x05])
                .await
                .unwrap();
            // Half-open until the peer disconnects
            let mut sink = [0u8; 16];
            let _ = tokio::io::AsyncReadExt::read(&mut sock, &mut sink).await;
        });

        let node = Node::new([127, 0, 0, 1], port);
        let mut stream = node.run(U16Decoder);
        assert_eq!(stream.next().await.unwrap().unwrap(), 300);
        assert_eq!(stream.next().await.unwrap().unwrap(), 5);

        node.terminate();
        assert!(stream.next().await.is_none());
        assert!(!node.is_connected().await);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_ends_on_peer_close() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            tokio::io::AsyncWriteExt::write_all(&mut sock, &[0x00, 0x07]).await.unwrap();
            // Dropping the socket closes the stream
        });

        let node = Node::new([127, 0, 0, 1], port);
        let mut stream = node.run(U16Decoder);
        assert_eq!(stream.next().await.unwrap().unwrap(), 7);
        assert!(stream.next().await.is_none());
        assert!(!node.is_connected().await);
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_active() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (_sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        });

        let node = Node::new([127, 0, 0, 1], port);
        node.connect().await.unwrap();
        let _stream = node.run(U16Decoder);
        // Give the first reader task time to claim the read half
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let mut second = node.run(U16Decoder);
        match second.next().await {
            Some(Err(NetError::AlreadyRunning)) => {}
            other => panic!("expected AlreadyRunning, got {:?}", other.map(|r| r.map(|_| ()))),
        }
    }
}
