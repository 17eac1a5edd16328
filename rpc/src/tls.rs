//! Mutual-TLS material for talking to chia services.
//!
//! Every chia service presents a certificate signed by the installation's
//! private CA, issued for a fixed name rather than the host it runs on. The
//! client therefore authenticates itself with a certificate pair from the
//! chia root and accepts whatever certificate the service presents, while
//! still checking handshake signatures.

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chia_tools_config::root::resolve_in_root;
use chia_tools_config::{ConfigDocument, ConfigError};

use crate::RpcError;

/// A client certificate chain and its private key, loaded from PEM files.
pub struct TlsIdentity {
    cert_chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl TlsIdentity {
    /// Load a PEM certificate and PEM private key (PKCS#1, PKCS#8 or SEC1).
    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self, RpcError> {
        let mut cert_reader = open(cert_path)?;
        let cert_chain = rustls_pemfile::certs(&mut cert_reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| RpcError::Certificate {
                path: cert_path.to_path_buf(),
                source,
            })?;
        if cert_chain.is_empty() {
            return Err(RpcError::Tls(format!(
                "no certificates found in {}",
                cert_path.display()
            )));
        }

        let mut key_reader = open(key_path)?;
        let key = rustls_pemfile::private_key(&mut key_reader)
            .map_err(|source| RpcError::Certificate {
                path: key_path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| RpcError::MissingKey(key_path.to_path_buf()))?;

        Ok(Self { cert_chain, key })
    }

    /// Load the pair named by `<section>.<crt_field>` / `<section>.<key_field>`
    /// in the config, resolved against the chia root.
    pub fn from_config(
        doc: &ConfigDocument,
        chia_root: &Path,
        section: &str,
        crt_field: &str,
        key_field: &str,
    ) -> Result<Self, RpcError> {
        let cert = config_path(doc, chia_root, &format!("{section}.{crt_field}"))?;
        let key = config_path(doc, chia_root, &format!("{section}.{key_field}"))?;
        tracing::debug!(cert = %cert.display(), key = %key.display(), "loading TLS identity");
        Self::from_pem_files(&cert, &key)
    }

    /// Build a rustls client config presenting this identity.
    pub fn client_config(&self) -> Result<ClientConfig, RpcError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .map_err(|e| RpcError::Tls(e.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AnyServerCert { provider }))
            .with_client_auth_cert(self.cert_chain.clone(), self.key.clone_key())
            .map_err(|e| RpcError::Tls(e.to_string()))?;
        Ok(config)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, RpcError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| RpcError::Certificate {
            path: path.to_path_buf(),
            source,
        })
}

fn config_path(doc: &ConfigDocument, chia_root: &Path, field: &str) -> Result<PathBuf, RpcError> {
    let raw = doc
        .string_at(field)
        .ok_or_else(|| ConfigError::MissingField(field.to_string()))?;
    Ok(resolve_in_root(chia_root, raw))
}

/// Accepts any server certificate; handshake signatures are still verified.
#[derive(Debug)]
struct AnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_certificate_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cert = dir.path().join("missing.crt");
        let err = TlsIdentity::from_pem_files(&cert, &dir.path().join("missing.key"))
            .err()
            .expect("missing file");
        match err {
            RpcError::Certificate { path, .. } => assert_eq!(path, cert),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_certificate_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cert = dir.path().join("empty.crt");
        let key = dir.path().join("empty.key");
        std::fs::write(&cert, "").expect("write");
        std::fs::write(&key, "").expect("write");
        assert!(matches!(
            TlsIdentity::from_pem_files(&cert, &key),
            Err(RpcError::Tls(_))
        ));
    }

    #[test]
    fn config_fields_must_exist() {
        let doc = ConfigDocument::from_yaml_str("daemon_ssl:\n  private_crt: a.crt\n").expect("parse");
        let err = TlsIdentity::from_config(&doc, Path::new("/root"), "daemon_ssl", "private_crt", "private_key")
            .err()
            .expect("missing key field");
        assert!(matches!(err, RpcError::Config(ConfigError::MissingField(_))));
    }
}
