//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use loan_ledger::outbound::mail::DEFAULT_MAIL_FROM;
use url::Url;

/// PEM certificate chain and private key served over HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub(crate) cert_path: PathBuf,
    pub(crate) key_path: PathBuf,
}

impl TlsPaths {
    /// Pair a certificate chain with its private key.
    #[must_use]
    pub fn new(cert_path: PathBuf, key_path: PathBuf) -> Self {
        Self {
            cert_path,
            key_path,
        }
    }
}

/// Resolved configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_dir: PathBuf,
    pub(crate) allowed_origin: Url,
    pub(crate) mail_from: String,
    pub(crate) tls: Option<TlsPaths>,
}

impl ServerConfig {
    /// Configuration with the default reminder sender.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, data_dir: PathBuf, allowed_origin: Url) -> Self {
        Self {
            bind_addr,
            data_dir,
            allowed_origin,
            mail_from: DEFAULT_MAIL_FROM.to_owned(),
            tls: None,
        }
    }

    /// Override the sender used when a reminder names none.
    #[must_use]
    pub fn with_mail_from(mut self, mail_from: impl Into<String>) -> Self {
        self.mail_from = mail_from.into();
        self
    }

    /// Serve HTTPS with the given certificate and key instead of plain HTTP.
    #[must_use]
    pub fn with_tls(mut self, tls: Option<TlsPaths>) -> Self {
        self.tls = tls;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
