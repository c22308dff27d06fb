//! TLS certificate validity probe.
//!
//! Connects to the domain on port 443, completes a rustls handshake, and
//! checks the leaf certificate's validity window. Runs independently of the
//! security checker's page fetch so a broken certificate can be reported
//! even when the page itself was reachable.
//!
//! Uses `tokio-rustls` for the async handshake and `x509-parser` for
//! certificate parsing.

use std::sync::Arc;

use chrono::NaiveDateTime;
use log::debug;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::error_handling::CheckError;

/// Leaf certificate validity window, as observed by the probe.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateValidity {
    /// `valid_from <= now <= valid_to`.
    pub valid: bool,
    /// Start of the validity window (UTC).
    pub valid_from: NaiveDateTime,
    /// End of the validity window (UTC).
    pub valid_to: NaiveDateTime,
}

/// Probes the domain's TLS certificate and returns its validity window.
///
/// The domain may carry a port for page fetching; the probe always targets
/// port 443 on the bare host. Connection, handshake, and parsing failures
/// are all reported as errors — the caller degrades them to an `Invalid`
/// SSL status rather than failing the whole security check.
pub async fn probe_certificate(domain: &str) -> Result<CertificateValidity, CheckError> {
    let host = domain.split(':').next().unwrap_or(domain).to_string();
    debug!("Probing TLS certificate for {host}");

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let server_name = ServerName::try_from(host.clone())
        .map_err(|e| CheckError::UpstreamUnreachable(format!("invalid server name: {e}")))?;

    let sock = match tokio::time::timeout(
        std::time::Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host.clone(), 443)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => {
            return Err(CheckError::UpstreamUnreachable(format!(
                "failed to connect to {host}:443: {e}"
            )))
        }
        Err(_) => {
            return Err(CheckError::UpstreamTimeout(
                std::time::Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            ))
        }
    };

    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = match tokio::time::timeout(
        std::time::Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            return Err(CheckError::UpstreamUnreachable(format!(
                "TLS handshake failed for {host}: {e}"
            )))
        }
        Err(_) => {
            return Err(CheckError::UpstreamTimeout(
                std::time::Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            ))
        }
    };

    let certs = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .ok_or_else(|| CheckError::InvalidUpstreamData(format!("no certificate from {host}")))?;
    let cert_der = certs
        .first()
        .ok_or_else(|| CheckError::InvalidUpstreamData(format!("empty certificate chain from {host}")))?;

    let (_, cert) = x509_parser::parse_x509_certificate(cert_der.as_ref())
        .map_err(|e| CheckError::InvalidUpstreamData(format!("certificate parse error: {e}")))?;
    let validity = &cert.tbs_certificate.validity;

    let valid_from = parse_asn1_time(validity.not_before.to_rfc2822(), "not_before")?;
    let valid_to = parse_asn1_time(validity.not_after.to_rfc2822(), "not_after")?;

    let now = chrono::Utc::now().naive_utc();
    Ok(CertificateValidity {
        valid: valid_from <= now && now <= valid_to,
        valid_from,
        valid_to,
    })
}

fn parse_asn1_time(
    rfc2822: Result<String, impl std::fmt::Display>,
    field: &str,
) -> Result<NaiveDateTime, CheckError> {
    let raw = rfc2822.map_err(|e| {
        CheckError::InvalidUpstreamData(format!("RFC2822 conversion error for {field}: {e}"))
    })?;
    NaiveDateTime::parse_from_str(&raw, "%a, %d %b %Y %H:%M:%S %z")
        .map_err(|_| CheckError::InvalidUpstreamData(format!("failed to parse {field}")))
}
