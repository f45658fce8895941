// ── Runtime connection configuration ──
//
// These types describe how to reach the registry backend. They carry
// credential data and tuning, but never touch disk: the CLI builds a
// `ClientConfig` and hands it in.

use std::time::Duration;

use petadmin_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::store::StoreOptions;

/// Login credentials for `/autenticacao/login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Everything needed to open a session against one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., `https://api.example.com`).
    pub url: Url,
    /// `None` for backends that do not require login.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub store: StoreOptions,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            store: StoreOptions::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
