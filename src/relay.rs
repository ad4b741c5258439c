//! The per-session relay pump.
//!
//! One pump instance owns exactly one QUIC-side stream pair and one TCP
//! backend connection, and copies bytes between them in both directions
//! until the session ends. The two directions are independent tasks with
//! private buffers; within a direction bytes are forwarded in exact read
//! order, byte-transparent, with no framing or inspection.
//!
//! A session ends at the first terminal event on either side: a read
//! end-of-stream, a read error, or a write failure. The pump then closes
//! the QUIC connection, cancels the peer direction, and waits for it, so
//! both connection handles are released before the pump returns. Closing
//! is idempotent; the first close wins.

use quinn::{Connection, RecvStream, SendStream};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinError;

/// Private copy buffer size per direction.
pub const RELAY_BUFFER_SIZE: usize = 80 * 1024;

/// How long to let in-flight stream data drain before the connection
/// close discards it.
const CLOSE_GRACE: Duration = Duration::from_millis(50);

/// Copies bytes from `src` to `dst` until end-of-stream or failure.
///
/// On end-of-stream the destination is shut down so the far side observes
/// the end of the byte stream. Returns the number of bytes forwarded.
async fn pump<R, W>(mut src: R, mut dst: W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; RELAY_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = src.read(&mut buf).await?;
        if n == 0 {
            dst.shutdown().await?;
            return Ok(total);
        }
        dst.write_all(&buf[..n]).await?;
        total += n as u64;
    }
}

/// Runs the bidirectional relay for one session.
///
/// Takes exclusive ownership of both ends; when it returns, both are
/// closed.
pub async fn relay(
    connection: Connection,
    quic_send: SendStream,
    quic_recv: RecvStream,
    backend: TcpStream,
) {
    let remote_addr = connection.remote_address();
    let (tcp_read, tcp_write) = backend.into_split();

    let mut client_to_backend = tokio::spawn(async move { pump(quic_recv, tcp_write).await });
    let mut backend_to_client = tokio::spawn(async move { pump(tcp_read, quic_send).await });

    // Whichever direction terminates first ends the session. Closing the
    // QUIC connection unblocks the peer task's QUIC operation; aborting it
    // releases its TCP half, which closes the TCP side.
    tokio::select! {
        result = &mut client_to_backend => {
            log_direction(remote_addr, "client_to_backend", result);
            tokio::time::sleep(CLOSE_GRACE).await;
            connection.close(0u32.into(), b"session ended");
            backend_to_client.abort();
            let _ = backend_to_client.await;
        }
        result = &mut backend_to_client => {
            log_direction(remote_addr, "backend_to_client", result);
            tokio::time::sleep(CLOSE_GRACE).await;
            connection.close(0u32.into(), b"session ended");
            client_to_backend.abort();
            let _ = client_to_backend.await;
        }
    }

    tracing::info!(%remote_addr, "session ended");
}

fn log_direction(
    remote_addr: SocketAddr,
    direction: &str,
    result: std::result::Result<std::io::Result<u64>, JoinError>,
) {
    match result {
        Ok(Ok(bytes)) => {
            tracing::debug!(%remote_addr, direction, bytes, "relay direction completed")
        }
        Ok(Err(e)) => {
            tracing::error!(%remote_addr, direction, error = %e, "relay direction failed")
        }
        Err(e) => {
            tracing::error!(%remote_addr, direction, error = %e, "relay task panicked")
        }
    }
}
