//! quictun - QUIC to TCP tunnel endpoint.
//!
//! Accepts encrypted QUIC connections and relays their payload
//! transparently to a plaintext TCP backend, and vice versa. Encryption
//! terminates at the tunnel with an ephemeral self-signed certificate
//! generated fresh at every process start.

pub mod admin;
pub mod cli;
pub mod common;
pub mod error;
pub mod logging;
pub mod relay;
pub mod server;
pub mod tls;

pub use cli::Cli;
pub use common::{resolve_listen_addr, split_host_port, DnsResolver};
pub use error::{Error, ExitCode, Result};
pub use logging::LogHandle;
pub use relay::{relay, RELAY_BUFFER_SIZE};
pub use server::{accept_loop, run_server};
pub use tls::{
    build_server_config, compute_fingerprint, format_fingerprint, generate_credential,
    EphemeralCredential, TlsError, TlsResult,
};
