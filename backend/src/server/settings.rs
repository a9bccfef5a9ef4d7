//! Runtime settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a `LOANS_*` environment
//! variable, or a config file; anything left unset falls back to the
//! defaults below. HTTPS is enabled by setting both `cert_path` and
//! `key_path`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use loan_ledger::outbound::mail::DEFAULT_MAIL_FROM;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use super::{ServerConfig, TlsPaths};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_owned()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_allowed_origin() -> String {
    DEFAULT_ALLOWED_ORIGIN.to_owned()
}

/// Settings rejected while building the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid allowed origin `{value}`: {source}")]
    AllowedOrigin {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("`{set}` is set without `{missing}`; HTTPS needs both")]
    IncompleteTls {
        set: &'static str,
        missing: &'static str,
    },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOANS")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: String,
    /// Directory holding `ledger.json` and `email_logs.jsonl`.
    #[ortho_config(default = default_data_dir())]
    pub data_dir: PathBuf,
    /// The single browser origin allowed to call the API and open a live
    /// session.
    #[ortho_config(default = default_allowed_origin())]
    pub allowed_origin: String,
    /// Sender used when a reminder names none.
    pub mail_from: Option<String>,
    /// PEM certificate chain for HTTPS.
    pub cert_path: Option<PathBuf>,
    /// PEM private key for HTTPS.
    pub key_path: Option<PathBuf>,
}

impl AppSettings {
    /// Configured bind address.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|source| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Configured data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Configured browser origin.
    ///
    /// # Errors
    /// [`SettingsError::AllowedOrigin`] when the value is not a URL.
    pub fn allowed_origin(&self) -> Result<Url, SettingsError> {
        Url::parse(self.allowed_origin.trim()).map_err(|source| SettingsError::AllowedOrigin {
            value: self.allowed_origin.clone(),
            source,
        })
    }

    /// Certificate and key when HTTPS is configured.
    ///
    /// # Errors
    /// [`SettingsError::IncompleteTls`] when only one of the pair is set.
    pub fn tls_paths(&self) -> Result<Option<TlsPaths>, SettingsError> {
        match (&self.cert_path, &self.key_path) {
            (Some(cert), Some(key)) => Ok(Some(TlsPaths::new(cert.clone(), key.clone()))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(SettingsError::IncompleteTls {
                set: "cert_path",
                missing: "key_path",
            }),
            (None, Some(_)) => Err(SettingsError::IncompleteTls {
                set: "key_path",
                missing: "cert_path",
            }),
        }
    }

    /// Configured default sender.
    pub fn mail_from(&self) -> &str {
        self.mail_from
            .as_deref()
            .map(str::trim)
            .filter(|from| !from.is_empty())
            .unwrap_or(DEFAULT_MAIL_FROM)
    }

    /// Resolve every setting into a [`ServerConfig`].
    ///
    /// # Errors
    /// Propagates the first invalid setting.
    pub fn server_config(&self) -> Result<ServerConfig, SettingsError> {
        Ok(ServerConfig::new(
            self.bind_addr()?,
            self.data_dir().to_path_buf(),
            self.allowed_origin()?,
        )
        .with_mail_from(self.mail_from())
        .with_tls(self.tls_paths()?))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "LOANS_BIND_ADDR",
        "LOANS_DATA_DIR",
        "LOANS_ALLOWED_ORIGIN",
        "LOANS_MAIL_FROM",
        "LOANS_CERT_PATH",
        "LOANS_KEY_PATH",
    ];

    fn settings(cert_path: Option<&str>, key_path: Option<&str>) -> AppSettings {
        AppSettings {
            bind_addr: default_bind_addr(),
            data_dir: default_data_dir(),
            allowed_origin: default_allowed_origin(),
            mail_from: None,
            cert_path: cert_path.map(PathBuf::from),
            key_path: key_path.map(PathBuf::from),
        }
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("loan-ledger")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            "0.0.0.0:3001".parse::<SocketAddr>().expect("socket addr")
        );
        assert_eq!(settings.data_dir(), Path::new("./data"));
        assert_eq!(
            settings.allowed_origin().expect("default origin").as_str(),
            "http://localhost:5173/"
        );
        assert_eq!(settings.mail_from(), DEFAULT_MAIL_FROM);
        assert_eq!(settings.tls_paths().expect("no tls"), None);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("LOANS_BIND_ADDR", Some("127.0.0.1:8088".to_owned())),
            ("LOANS_DATA_DIR", Some("/srv/loans".to_owned())),
            (
                "LOANS_ALLOWED_ORIGIN",
                Some("https://desk.library.example".to_owned()),
            ),
            ("LOANS_MAIL_FROM", Some("desk@library.example".to_owned())),
            ("LOANS_CERT_PATH", None),
            ("LOANS_KEY_PATH", None),
        ]);

        let config = load_from_empty_args()
            .server_config()
            .expect("valid settings");
        assert_eq!(config.bind_addr().port(), 8088);
        assert_eq!(config.data_dir, PathBuf::from("/srv/loans"));
        assert_eq!(
            config.allowed_origin.host_str(),
            Some("desk.library.example")
        );
        assert_eq!(config.mail_from, "desk@library.example");
    }

    #[rstest]
    #[case("LOANS_BIND_ADDR", "not-an-address")]
    #[case("LOANS_ALLOWED_ORIGIN", "desk.library.example")]
    fn malformed_values_are_reported(#[case] name: &str, #[case] value: &str) {
        let _guard = lock_env(VARS.map(|var| {
            let value = (var == name).then(|| value.to_owned());
            (var, value)
        }));

        let err = load_from_empty_args()
            .server_config()
            .expect_err("invalid setting");
        assert!(err.to_string().contains(value), "got {err}");
    }

    #[rstest]
    fn blank_mail_from_falls_back() {
        let settings = AppSettings {
            mail_from: Some("   ".to_owned()),
            ..settings(None, None)
        };
        assert_eq!(settings.mail_from(), DEFAULT_MAIL_FROM);
    }

    #[rstest]
    fn certificate_pair_from_environment_enables_https() {
        let _guard = lock_env(VARS.map(|var| {
            let value = match var {
                "LOANS_CERT_PATH" => Some("/etc/loans/cert.pem".to_owned()),
                "LOANS_KEY_PATH" => Some("/etc/loans/key.pem".to_owned()),
                _ => None,
            };
            (var, value)
        }));

        let config = load_from_empty_args()
            .server_config()
            .expect("valid settings");
        assert_eq!(
            config.tls,
            Some(TlsPaths::new(
                PathBuf::from("/etc/loans/cert.pem"),
                PathBuf::from("/etc/loans/key.pem"),
            ))
        );
    }

    #[rstest]
    #[case(Some("cert.pem"), None, "key_path")]
    #[case(None, Some("key.pem"), "cert_path")]
    fn half_a_certificate_pair_is_rejected(
        #[case] cert: Option<&str>,
        #[case] key: Option<&str>,
        #[case] missing: &str,
    ) {
        let err = settings(cert, key)
            .server_config()
            .expect_err("incomplete pair");
        assert!(err.to_string().contains(missing), "got {err}");
    }
}
