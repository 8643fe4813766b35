//! Typed client settings and the resolved, immutable `ClientContext`.
//!
//! # Design
//! - `ClientSettings` is the raw layer: every option optional and unparsed.
//! - `ClientContext` is built once per process and never mutated.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
use crate::error::{ConfigError, ConfigResult};
use crate::validate::{non_blank, parse_connect_timeout, parse_port};

/// TLS negotiation mode for the connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TlsMode {
    /// Require TLS and verify the server certificate and hostname.
    #[serde(rename = "true")]
    Verify,
    /// Never use TLS.
    #[serde(rename = "false")]
    Disabled,
    /// Require TLS without verifying the server certificate.
    #[serde(rename = "skip-verify")]
    SkipVerify,
}

impl TlsMode {
    /// Render the mode as accepted on the configuration surface.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "true",
            Self::Disabled => "false",
            Self::SkipVerify => "skip-verify",
        }
    }
}

impl FromStr for TlsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(Self::Verify),
            "false" => Ok(Self::Disabled),
            "skip-verify" => Ok(Self::SkipVerify),
            other => Err(ConfigError::InvalidField {
                field: "tls",
                value: Some(other.to_string()),
                reason: "must be one of true, false, skip-verify",
            }),
        }
    }
}

/// Password exchange used when logging in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticationType {
    /// MySQL native password authentication.
    #[default]
    Native,
    /// Cleartext password plugin, typically for IAM-style tokens.
    Cleartext,
}

impl AuthenticationType {
    /// Render the type as accepted on the configuration surface.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Cleartext => "cleartext",
        }
    }
}

impl FromStr for AuthenticationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            "cleartext" => Ok(Self::Cleartext),
            other => Err(ConfigError::InvalidField {
                field: "authentication_type",
                value: Some(other.to_string()),
                reason: "must be one of native, cleartext",
            }),
        }
    }
}

/// Unvalidated client options from a single source.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Hostname or IP address of the instance.
    pub endpoint: Option<String>,
    /// TCP port, as text.
    pub port: Option<String>,
    /// Login user.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// TLS mode, as text.
    pub tls: Option<String>,
    /// Authentication type, as text.
    pub authentication_type: Option<String>,
    /// Connect timeout in whole seconds, as text.
    pub connect_timeout: Option<String>,
}

impl ClientSettings {
    /// Fill every unset option in `self` from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            endpoint: self.endpoint.or(fallback.endpoint),
            port: self.port.or(fallback.port),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            tls: self.tls.or(fallback.tls),
            authentication_type: self.authentication_type.or(fallback.authentication_type),
            connect_timeout: self.connect_timeout.or(fallback.connect_timeout),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tls", &self.tls)
            .field("authentication_type", &self.authentication_type)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Validated, immutable connection parameters for one process.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientContext {
    endpoint: String,
    port: Option<u16>,
    username: String,
    password: Option<String>,
    tls: Option<TlsMode>,
    authentication: AuthenticationType,
    connect_timeout: Duration,
}

impl ClientContext {
    /// Validate raw settings into a context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEndpoint`] or [`ConfigError::MissingUsername`]
    /// when a required option is blank, and [`ConfigError::InvalidField`] when an
    /// option cannot be parsed.
    pub fn resolve(settings: ClientSettings) -> ConfigResult<Self> {
        let endpoint = non_blank(settings.endpoint).ok_or(ConfigError::MissingEndpoint)?;
        let username = non_blank(settings.username).ok_or(ConfigError::MissingUsername)?;

        let port = match non_blank(settings.port) {
            Some(raw) => parse_port(&raw)?,
            None => None,
        };
        let tls = non_blank(settings.tls)
            .map(|raw| raw.parse::<TlsMode>())
            .transpose()?;
        let authentication = non_blank(settings.authentication_type)
            .map(|raw| raw.parse::<AuthenticationType>())
            .transpose()?
            .unwrap_or_default();
        let connect_timeout = match non_blank(settings.connect_timeout) {
            Some(raw) => parse_connect_timeout(&raw)?,
            None => DEFAULT_CONNECT_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            port,
            username,
            password: settings.password,
            tls,
            authentication,
            connect_timeout,
        })
    }

    /// Hostname or IP address of the instance.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Explicitly configured port, if any.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Port the driver will dial.
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Login user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Requested TLS mode; `None` defers to the driver default.
    #[must_use]
    pub const fn tls(&self) -> Option<TlsMode> {
        self.tls
    }

    /// Password exchange used when logging in.
    #[must_use]
    pub const fn authentication(&self) -> AuthenticationType {
        self.authentication
    }

    /// Budget for establishing the first connection.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Dial address, `host:port` when a port is configured.
    #[must_use]
    pub fn address(&self) -> String {
        match self.port {
            Some(port) if self.endpoint.contains(':') => format!("[{}]:{port}", self.endpoint),
            Some(port) => format!("{}:{port}", self.endpoint),
            None => self.endpoint.clone(),
        }
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tls", &self.tls)
            .field("authentication", &self.authentication)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ClientSettings {
        ClientSettings {
            endpoint: Some("db.example.internal".to_string()),
            username: Some("admin".to_string()),
            ..ClientSettings::default()
        }
    }

    #[test]
    fn resolve_applies_defaults() {
        let context = ClientContext::resolve(minimal()).expect("minimal settings resolve");
        assert_eq!(context.endpoint(), "db.example.internal");
        assert_eq!(context.port(), None);
        assert_eq!(context.effective_port(), 3306);
        assert_eq!(context.tls(), None);
        assert_eq!(context.authentication(), AuthenticationType::Native);
        assert_eq!(context.connect_timeout(), Duration::from_secs(30));
        assert_eq!(context.address(), "db.example.internal");
    }

    #[test]
    fn resolve_rejects_blank_required_fields() {
        let mut settings = minimal();
        settings.endpoint = Some("   ".to_string());
        assert_eq!(
            ClientContext::resolve(settings),
            Err(ConfigError::MissingEndpoint)
        );

        let mut settings = minimal();
        settings.username = None;
        assert_eq!(
            ClientContext::resolve(settings),
            Err(ConfigError::MissingUsername)
        );
    }

    #[test]
    fn resolve_parses_optional_fields() {
        let settings = ClientSettings {
            port: Some("3307".to_string()),
            password: Some("hunter2".to_string()),
            tls: Some("skip-verify".to_string()),
            authentication_type: Some("cleartext".to_string()),
            connect_timeout: Some("5".to_string()),
            ..minimal()
        };
        let context = ClientContext::resolve(settings).expect("settings resolve");
        assert_eq!(context.port(), Some(3307));
        assert_eq!(context.password(), Some("hunter2"));
        assert_eq!(context.tls(), Some(TlsMode::SkipVerify));
        assert_eq!(context.authentication(), AuthenticationType::Cleartext);
        assert_eq!(context.connect_timeout(), Duration::from_secs(5));
        assert_eq!(context.address(), "db.example.internal:3307");
    }

    #[test]
    fn address_brackets_ipv6_hosts() {
        let settings = ClientSettings {
            endpoint: Some("::1".to_string()),
            port: Some("3306".to_string()),
            ..minimal()
        };
        let context = ClientContext::resolve(settings).expect("settings resolve");
        assert_eq!(context.address(), "[::1]:3306");
    }

    #[test]
    fn resolve_rejects_unknown_enums() {
        let settings = ClientSettings {
            tls: Some("sometimes".to_string()),
            ..minimal()
        };
        assert!(matches!(
            ClientContext::resolve(settings),
            Err(ConfigError::InvalidField { field: "tls", .. })
        ));

        let settings = ClientSettings {
            authentication_type: Some("kerberos".to_string()),
            ..minimal()
        };
        assert!(matches!(
            ClientContext::resolve(settings),
            Err(ConfigError::InvalidField {
                field: "authentication_type",
                ..
            })
        ));
    }

    #[test]
    fn debug_output_redacts_password() {
        let settings = ClientSettings {
            password: Some("hunter2".to_string()),
            ..minimal()
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
        let context = ClientContext::resolve(settings).expect("settings resolve");
        let rendered = format!("{context:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn enums_render_configuration_values() {
        for mode in [TlsMode::Verify, TlsMode::Disabled, TlsMode::SkipVerify] {
            assert_eq!(mode.as_str().parse::<TlsMode>(), Ok(mode));
        }
        assert_eq!(
            serde_json::to_string(&TlsMode::SkipVerify).expect("serialize"),
            "\"skip-verify\""
        );
        assert_eq!(AuthenticationType::Cleartext.as_str(), "cleartext");
    }

    #[test]
    fn or_prefers_explicit_values() {
        let explicit = ClientSettings {
            endpoint: Some("explicit".to_string()),
            ..ClientSettings::default()
        };
        let env = ClientSettings {
            endpoint: Some("from-env".to_string()),
            username: Some("env-user".to_string()),
            ..ClientSettings::default()
        };
        let merged = explicit.or(env);
        assert_eq!(merged.endpoint.as_deref(), Some("explicit"));
        assert_eq!(merged.username.as_deref(), Some("env-user"));
    }
}
