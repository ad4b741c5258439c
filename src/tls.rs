//! TLS/certificate handling for quictun.
//!
//! This module provides:
//! - Ephemeral self-signed certificate generation (ECDSA P-256)
//! - SHA-256 fingerprint computation
//! - The rustls server configuration builder for the QUIC listener
//!
//! Credentials are generated fresh at every process start and are never
//! written to disk.

use rcgen::{CertificateParams, KeyPair, KeyUsagePurpose};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::ServerConfig;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Validity window of the ephemeral certificate. Long-lived processes
/// outliving this window need a restart.
pub const CREDENTIAL_VALIDITY: time::Duration = time::Duration::hours(1);

/// Error type for TLS operations.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("certificate generation failed: {0}")]
    CertificateGeneration(String),

    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
}

/// Result type for TLS operations.
pub type TlsResult<T> = std::result::Result<T, TlsError>;

/// An in-memory certificate and key pair with computed fingerprint.
#[derive(Clone)]
pub struct EphemeralCredential {
    /// Self-signed certificate in DER format.
    pub cert_der: Vec<u8>,
    /// Private key in PKCS#8 DER format.
    pub key_der: Vec<u8>,
    /// SHA-256 fingerprint of the certificate (colon-separated hex).
    pub fingerprint: String,
}

/// Generates an ephemeral self-signed ECDSA P-256 credential, valid from
/// now for [`CREDENTIAL_VALIDITY`].
///
/// No network or disk I/O; failure means the process cannot proceed.
pub fn generate_credential() -> TlsResult<EphemeralCredential> {
    let key_pair = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)
        .map_err(|e| TlsError::CertificateGeneration(e.to_string()))?;

    let mut params = CertificateParams::new(vec!["localhost".to_string()])
        .map_err(|e| TlsError::CertificateGeneration(e.to_string()))?;

    let now = time::OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + CREDENTIAL_VALIDITY;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyCertSign,
    ];

    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| TlsError::CertificateGeneration(e.to_string()))?;

    let cert_der = cert.der().to_vec();
    let fingerprint = compute_fingerprint(&cert_der);

    Ok(EphemeralCredential {
        cert_der,
        key_der: key_pair.serialize_der(),
        fingerprint,
    })
}

/// Builds the server TLS configuration for the QUIC listener.
pub fn build_server_config(
    credential: &EphemeralCredential,
    alpn: &str,
) -> TlsResult<ServerConfig> {
    let certs = vec![CertificateDer::from(credential.cert_der.clone())];
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(credential.key_der.clone()));

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| TlsError::TlsConfig(e.to_string()))?;

    config.alpn_protocols = vec![alpn.as_bytes().to_vec()];

    Ok(config)
}

/// Computes the SHA-256 fingerprint of a DER-encoded certificate.
///
/// Returns the fingerprint in colon-separated lowercase hex format.
pub fn compute_fingerprint(cert_der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cert_der);
    let hash = hasher.finalize();
    format_fingerprint(&hash.into())
}

/// Formats a fingerprint as colon-separated lowercase hex.
pub fn format_fingerprint(bytes: &[u8; 32]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
