//! Raw TLS handshake observation.
//!
//! reqwest never exposes the negotiated session parameters, so the TLS
//! scorer performs its own handshake against port 443 with the same rustls
//! backend and reads the connection state directly.

use std::sync::Arc;

use aihint_core::{Result, ScoreError};
use chrono::{DateTime, TimeZone, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Everything the security scorer needs from one handshake.
#[derive(Debug, Clone)]
pub struct TlsObservation {
    /// Negotiated protocol version, e.g. `"TLSv1.3"`
    pub protocol: String,
    /// Negotiated cipher suite name
    pub cipher_suite: String,
    /// Symmetric key strength in bits (from the suite's AEAD)
    pub cipher_bits: u32,
    /// Leaf certificate validity start
    pub not_before: DateTime<Utc>,
    /// Leaf certificate validity end
    pub not_after: DateTime<Utc>,
    /// Leaf certificate issuer DN
    pub issuer: String,
    /// Leaf certificate subject DN
    pub subject: String,
    /// Number of certificates the peer presented
    pub chain_len: usize,
}

impl TlsObservation {
    /// Days until the leaf certificate expires; negative once expired.
    #[must_use]
    pub fn days_to_expiry(&self) -> i64 {
        (self.not_after - Utc::now()).num_days()
    }

    /// True when issuer and subject are the same DN and the peer sent no
    /// further chain, the usual self-signed shape.
    #[must_use]
    pub fn looks_self_signed(&self) -> bool {
        self.chain_len <= 1 && self.issuer == self.subject
    }
}

/// Performs TLS handshakes against `host:443` using the webpki root set.
#[derive(Clone)]
pub struct TlsInspector {
    connector: TlsConnector,
}

impl TlsInspector {
    /// Inspector trusting the bundled webpki roots.
    ///
    /// The crypto provider is named explicitly: the dependency graph links
    /// more than one, so the process-level default is ambiguous and the
    /// plain `ClientConfig::builder()` would panic.
    pub fn new() -> Result<Self> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| ScoreError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();
        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
        })
    }

    /// Handshake with `host:443` and capture the session parameters.
    pub async fn observe(&self, host: &str) -> Result<TlsObservation> {
        debug!(host, "TLS handshake");
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ScoreError::Tls(format!("{host}: {e}")))?;

        let stream = TcpStream::connect((host, 443))
            .await
            .map_err(|e| ScoreError::Tls(format!("{host}: {e}")))?;

        let tls = self
            .connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ScoreError::Tls(format!("{host}: {e}")))?;

        let (_, conn) = tls.get_ref();

        let protocol = conn
            .protocol_version()
            .map_or_else(|| "unknown".to_string(), protocol_name);

        let suite = conn
            .negotiated_cipher_suite()
            .ok_or_else(|| ScoreError::Tls(format!("{host}: no cipher suite negotiated")))?;
        let cipher_suite = format!("{:?}", suite.suite());
        let cipher_bits = suite_key_bits(&cipher_suite);

        let chain = conn
            .peer_certificates()
            .ok_or_else(|| ScoreError::Tls(format!("{host}: no peer certificate")))?;
        let leaf = chain
            .first()
            .ok_or_else(|| ScoreError::Tls(format!("{host}: empty certificate chain")))?;

        let (_, cert) = x509_parser::parse_x509_certificate(leaf.as_ref())
            .map_err(|e| ScoreError::CertParse(format!("{host}: {e}")))?;

        Ok(TlsObservation {
            protocol,
            cipher_suite,
            cipher_bits,
            not_before: asn1_to_utc(cert.validity().not_before),
            not_after: asn1_to_utc(cert.validity().not_after),
            issuer: cert.issuer().to_string(),
            subject: cert.subject().to_string(),
            chain_len: chain.len(),
        })
    }
}

fn protocol_name(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
        ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
        ProtocolVersion::TLSv1_1 => "TLSv1.1".to_string(),
        ProtocolVersion::TLSv1_0 => "TLSv1.0".to_string(),
        other => format!("{other:?}"),
    }
}

/// Symmetric strength from the suite name. rustls only ships AES-128,
/// AES-256, and ChaCha20 suites, so a name scan is exact. The AES-128
/// check runs before the 256 check because 1.2 suite names end in the
/// hash (`..AES_128_GCM_SHA256`).
fn suite_key_bits(suite: &str) -> u32 {
    if suite.contains("CHACHA20") {
        256
    } else if suite.contains("128") {
        128
    } else if suite.contains("256") {
        256
    } else {
        0
    }
}

/// ASN.1 `UTCTime`/`GeneralizedTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> DateTime<Utc> {
    let epoch = t.timestamp();
    Utc.timestamp_opt(epoch, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_bits_from_name() {
        assert_eq!(suite_key_bits("TLS13_AES_256_GCM_SHA384"), 256);
        assert_eq!(suite_key_bits("TLS13_CHACHA20_POLY1305_SHA256"), 256);
        assert_eq!(suite_key_bits("TLS13_AES_128_GCM_SHA256"), 128);
        assert_eq!(
            suite_key_bits("TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"),
            128
        );
        assert_eq!(suite_key_bits("TLS_NULL_WITH_NULL_NULL"), 0);
    }

    #[test]
    fn inspector_constructs_with_pinned_provider() {
        // Regresses if the client config falls back to the ambiguous
        // process-level provider lookup.
        assert!(TlsInspector::new().is_ok());
    }

    #[test]
    fn protocol_names() {
        assert_eq!(protocol_name(ProtocolVersion::TLSv1_3), "TLSv1.3");
        assert_eq!(protocol_name(ProtocolVersion::TLSv1_2), "TLSv1.2");
    }

    #[test]
    fn self_signed_shape() {
        let obs = TlsObservation {
            protocol: "TLSv1.3".to_string(),
            cipher_suite: "TLS13_AES_256_GCM_SHA384".to_string(),
            cipher_bits: 256,
            not_before: Utc::now() - chrono::Duration::days(10),
            not_after: Utc::now() + chrono::Duration::days(100),
            issuer: "CN=self".to_string(),
            subject: "CN=self".to_string(),
            chain_len: 1,
        };
        assert!(obs.looks_self_signed());
        assert_eq!(obs.days_to_expiry(), 99);
    }
}
