//! The QUIC listener and accept loop.
//!
//! Binds a quinn endpoint with the ephemeral credential and, for each
//! accepted session, dials the TCP backend and hands both ends to the
//! relay pump. The loop never blocks on an individual session.

use quinn::{Endpoint, ServerConfig as QuinnServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::admin::run_admin;
use crate::cli::Cli;
use crate::common::{resolve_listen_addr, DnsResolver};
use crate::error::{Error, Result};
use crate::logging::LogHandle;
use crate::relay::relay;
use crate::tls::{build_server_config, generate_credential};

/// Runs the tunnel endpoint until the process is terminated.
///
/// Credential generation, listen address resolution, and the listener
/// bind are startup preconditions: any failure is returned as a fatal
/// error. Everything after that is per-session and never escapes.
pub async fn run_server(args: &Cli, log: LogHandle) -> Result<()> {
    let credential =
        generate_credential().map_err(|e| Error::CredentialGeneration(e.to_string()))?;
    tracing::info!(fingerprint = %credential.fingerprint, "generated ephemeral certificate");

    if let Some(admin_addr) = args.admin_listen {
        let log = log.clone();
        tokio::spawn(async move {
            if let Err(e) = run_admin(admin_addr, log).await {
                tracing::error!(error = %e, "admin interface failed");
            }
        });
    }

    let tls_config = build_server_config(&credential, &args.alpn)
        .map_err(|e| Error::Config(format!("failed to build TLS config: {}", e)))?;

    let mut quinn_config = QuinnServerConfig::with_crypto(Arc::new(
        quinn::crypto::rustls::QuicServerConfig::try_from(tls_config)
            .map_err(|e| Error::Config(format!("failed to create QUIC config: {}", e)))?,
    ));

    let mut transport_config = quinn::TransportConfig::default();
    transport_config.max_idle_timeout(Some(
        args.idle_timeout
            .try_into()
            .map_err(|_| Error::Config("idle timeout too large".to_string()))?,
    ));
    if !args.keep_alive.is_zero() {
        transport_config.keep_alive_interval(Some(args.keep_alive));
    }
    quinn_config.transport_config(Arc::new(transport_config));

    let resolver = DnsResolver::new();
    let listen_addr = resolve_listen_addr(&args.listen, &resolver).await?;

    let endpoint = Endpoint::server(quinn_config, listen_addr)
        .map_err(|e| Error::ListenFailed(e.to_string()))?;

    tracing::info!(%listen_addr, backend = %args.backend, "listening");

    accept_loop(endpoint, args.backend.clone(), args.dial_timeout).await
}

/// Accepts sessions until the endpoint is closed.
///
/// Each session is handled on its own task; a failed handshake is logged
/// and the loop keeps accepting.
pub async fn accept_loop(endpoint: Endpoint, backend: String, dial_timeout: Duration) -> Result<()> {
    while let Some(incoming) = endpoint.accept().await {
        let backend = backend.clone();
        tokio::spawn(async move {
            let connection = match incoming.await {
                Ok(connection) => connection,
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                    return;
                }
            };
            let remote_addr = connection.remote_address();
            tracing::info!(%remote_addr, "accepted session");
            handle_session(connection, &backend, dial_timeout).await;
        });
    }
    Ok(())
}

/// Binds one accepted QUIC session to a fresh backend connection.
///
/// If the dial fails or times out the session is abandoned: the QUIC
/// connection is closed and no relay is started.
async fn handle_session(connection: quinn::Connection, backend: &str, dial_timeout: Duration) {
    let remote_addr = connection.remote_address();

    let backend_tcp = match tokio::time::timeout(dial_timeout, TcpStream::connect(backend)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            tracing::error!(%remote_addr, backend = %backend, error = %e, "backend dial failed");
            connection.close(0u32.into(), b"backend unavailable");
            return;
        }
        Err(_) => {
            tracing::error!(%remote_addr, backend = %backend, timeout = ?dial_timeout, "backend dial timed out");
            connection.close(0u32.into(), b"backend unavailable");
            return;
        }
    };

    // The tunnel peer opens the session's single bidirectional stream.
    let (quic_send, quic_recv) = match connection.accept_bi().await {
        Ok(streams) => streams,
        Err(e) => {
            tracing::error!(%remote_addr, error = %e, "failed to accept stream");
            connection.close(0u32.into(), b"no stream");
            return;
        }
    };

    relay(connection, quic_send, quic_recv, backend_tcp).await;
}
