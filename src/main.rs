//! quictun - QUIC to TCP tunnel endpoint.

use clap::Parser;
use quictun::{logging, run_server, Cli};

fn main() {
    let cli = Cli::parse();

    let log = logging::init(&cli.log_level);

    // Initialize the crypto provider
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        tracing::warn!(
            "failed to install default crypto provider (may already be installed): {:?}",
            e
        );
    }

    let runtime = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    if let Err(e) = runtime.block_on(run_server(&cli, log)) {
        tracing::error!(error = %e, "server error");
        std::process::exit(e.exit_code().into());
    }
}
