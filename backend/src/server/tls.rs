//! Rustls server configuration loaded from PEM files.

use std::io;
use std::path::Path;
use std::sync::Arc;

use rustls::crypto::ring;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use super::TlsPaths;

fn pem_error(path: &Path, error: impl std::fmt::Display) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{}: {error}", path.display()),
    )
}

/// Build a rustls server config from the certificate chain and key on disk.
///
/// # Errors
/// Returns [`io::Error`] when either file is unreadable, holds no PEM item of
/// the expected kind, or the key does not match the certificate.
pub(super) fn load_server_config(paths: &TlsPaths) -> io::Result<rustls::ServerConfig> {
    let certs = CertificateDer::pem_file_iter(&paths.cert_path)
        .and_then(|items| items.collect::<Result<Vec<_>, _>>())
        .map_err(|error| pem_error(&paths.cert_path, error))?;
    if certs.is_empty() {
        return Err(pem_error(&paths.cert_path, "no certificates found"));
    }
    let key = PrivateKeyDer::from_pem_file(&paths.key_path)
        .map_err(|error| pem_error(&paths.key_path, error))?;

    rustls::ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(io::Error::other)?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(io::Error::other)
}
