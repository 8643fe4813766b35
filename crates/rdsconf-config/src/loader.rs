//! Environment layering for client settings.
//!
//! Explicit values always win; environment variables fill whatever the caller
//! left unset.

use std::collections::HashMap;

use tracing::debug;

use crate::defaults::{
    ENV_AUTHENTICATION_TYPE, ENV_CONNECT_TIMEOUT, ENV_ENDPOINT, ENV_PASSWORD, ENV_PORT, ENV_TLS,
    ENV_USERNAME,
};
use crate::error::ConfigResult;
use crate::model::{ClientContext, ClientSettings};

/// Source of environment variable values.
pub trait EnvSource {
    /// Look up a variable, returning `None` when unset or not valid UTF-8.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl ClientSettings {
    /// Read every option from its environment variable.
    #[must_use]
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self {
            endpoint: env.var(ENV_ENDPOINT),
            port: env.var(ENV_PORT),
            username: env.var(ENV_USERNAME),
            password: env.var(ENV_PASSWORD),
            tls: env.var(ENV_TLS),
            authentication_type: env.var(ENV_AUTHENTICATION_TYPE),
            connect_timeout: env.var(ENV_CONNECT_TIMEOUT),
        }
    }
}

impl ClientContext {
    /// Resolve a context from explicit settings layered over the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when a required option is missing from
    /// both layers or an option fails validation.
    pub fn from_sources(explicit: ClientSettings, env: &impl EnvSource) -> ConfigResult<Self> {
        let context = Self::resolve(explicit.or(ClientSettings::from_env(env)))?;
        debug!(
            address = %context.address(),
            port = context.effective_port(),
            username = context.username(),
            tls = context.tls().map(crate::TlsMode::as_str),
            authentication = context.authentication().as_str(),
            connect_timeout_secs = context.connect_timeout().as_secs(),
            "resolved client configuration"
        );
        Ok(context)
    }
}
