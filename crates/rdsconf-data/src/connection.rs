//! Lazily established, process-wide connection to the managed instance.
//!
//! # Design
//! - The first caller opens and verifies the handle; concurrent callers wait on
//!   the same initialisation and share its result.
//! - A failed initialisation leaves the cache empty so a later call retries.
//! - Attempts are retried with capped exponential backoff until the connect
//!   budget is spent; the last sleep is cut short so a final attempt runs at
//!   the deadline. A zero budget means a single attempt.
//! - The error reports the most recent driver failure, even when the final
//!   attempt was cut off by the deadline.

use std::time::Duration;

use async_trait::async_trait;
use rdsconf_config::{AuthenticationType, ClientContext, TlsMode};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use sqlx::{Connection, MySqlPool};
use tokio::sync::OnceCell;
use tokio::time::{Instant, sleep, timeout};
use tracing::{info, instrument, warn};

use crate::error::{DataError, Result};
use crate::procedures::ProcedureClient;

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(1);
const MAX_POOL_CONNECTIONS: u32 = 4;

/// Opens and verifies one live handle to the instance.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Shared handle type returned to callers.
    type Handle: ProcedureClient + Clone + 'static;

    /// Open a handle and confirm it with a round-trip.
    async fn connect(&self) -> std::result::Result<Self::Handle, sqlx::Error>;
}

/// Connector for a MySQL instance described by a [`ClientContext`].
#[derive(Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
}

impl MySqlConnector {
    /// Build driver options from the client context.
    #[must_use]
    pub fn new(context: &ClientContext) -> Self {
        let mut options = MySqlConnectOptions::new()
            .host(context.endpoint())
            .port(context.effective_port())
            .username(context.username())
            .ssl_mode(ssl_mode(context.tls()))
            .enable_cleartext_plugin(matches!(
                context.authentication(),
                AuthenticationType::Cleartext
            ));
        if let Some(password) = context.password() {
            options = options.password(password);
        }
        Self { options }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Handle = MySqlPool;

    async fn connect(&self) -> std::result::Result<MySqlPool, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_POOL_CONNECTIONS)
            .connect_with(self.options.clone())
            .await?;
        let mut connection = pool.acquire().await?;
        connection.ping().await?;
        Ok(pool)
    }
}

const fn ssl_mode(tls: Option<TlsMode>) -> MySqlSslMode {
    match tls {
        Some(TlsMode::Verify) => MySqlSslMode::VerifyIdentity,
        Some(TlsMode::SkipVerify) => MySqlSslMode::Required,
        Some(TlsMode::Disabled) => MySqlSslMode::Disabled,
        None => MySqlSslMode::Preferred,
    }
}

/// Owns the single cached handle for one client context.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    connect_timeout: Duration,
    handle: OnceCell<C::Handle>,
}

impl ConnectionManager<MySqlConnector> {
    /// Manager for the MySQL instance described by `context`.
    #[must_use]
    pub fn for_context(context: &ClientContext) -> Self {
        Self::new(MySqlConnector::new(context), context.connect_timeout())
    }
}

impl<C: Connector> ConnectionManager<C> {
    /// Wrap a connector with the given connect budget.
    #[must_use]
    pub fn new(connector: C, connect_timeout: Duration) -> Self {
        Self {
            connector,
            connect_timeout,
            handle: OnceCell::new(),
        }
    }

    /// Whether a verified handle is already cached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Return the cached handle, establishing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Connect`] when no attempt succeeds within the
    /// connect budget.
    #[instrument(name = "connection.acquire", skip(self))]
    pub async fn acquire(&self) -> Result<C::Handle> {
        self.handle
            .get_or_try_init(|| self.connect_with_retry())
            .await
            .cloned()
    }

    async fn connect_with_retry(&self) -> Result<C::Handle> {
        let started = Instant::now();
        let deadline = started + self.connect_timeout;
        let mut backoff = INITIAL_BACKOFF;
        let mut attempts: u32 = 0;
        let mut last_error: Option<sqlx::Error> = None;

        loop {
            attempts += 1;
            let outcome = if self.connect_timeout.is_zero() {
                Some(self.connector.connect().await)
            } else {
                let remaining = deadline.saturating_duration_since(Instant::now());
                timeout(remaining, self.connector.connect()).await.ok()
            };

            match outcome {
                Some(Ok(handle)) => {
                    info!(attempts, elapsed = ?started.elapsed(), "database connection established");
                    return Ok(handle);
                }
                Some(Err(err)) => {
                    warn!(attempt = attempts, error = %err, "database connection attempt failed");
                    last_error = Some(err);
                }
                None => {
                    warn!(attempt = attempts, "database connection attempt timed out");
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if self.connect_timeout.is_zero() || remaining.is_zero() {
                return Err(DataError::Connect {
                    attempts,
                    timeout: self.connect_timeout,
                    source: last_error,
                });
            }
            sleep(backoff.min(remaining)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }
}
