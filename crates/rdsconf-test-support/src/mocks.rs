//! In-memory stand-ins for the instance and its connector.

use std::collections::BTreeMap;
use std::future::pending;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rdsconf_data::{Connector, DataError, DataResult, ProcedureClient, SettingRow};
use tokio::time::{Instant, sleep};

#[derive(Debug, Default)]
struct FakeState {
    settings: BTreeMap<String, (Option<i64>, String)>,
    set_calls: Vec<(String, i64)>,
    show_calls: usize,
    fail_reads: bool,
    fail_set_for: Option<String>,
}

/// Instance double implementing both configuration procedures in memory.
///
/// Clones share state; each clone handed out by [`FakeConnector`] carries the
/// session number of the attempt that produced it.
#[derive(Debug, Clone, Default)]
pub struct FakeInstance {
    state: Arc<Mutex<FakeState>>,
    session: u64,
}

impl FakeInstance {
    /// Instance supporting the given `(name, value, description)` settings.
    #[must_use]
    pub fn with_settings<'a>(
        settings: impl IntoIterator<Item = (&'a str, Option<i64>, &'a str)>,
    ) -> Self {
        let instance = Self::default();
        {
            let mut state = instance.lock();
            for (name, value, description) in settings {
                state
                    .settings
                    .insert(name.to_string(), (value, description.to_string()));
            }
        }
        instance
    }

    /// Instance exposing the stock RDS MySQL configuration surface.
    #[must_use]
    pub fn rds_defaults() -> Self {
        Self::with_settings([
            (
                "binlog retention hours",
                None,
                "binlog retention hours specifies the duration in hours before binary logs are automatically deleted.",
            ),
            (
                "source delay",
                Some(0),
                "source delay specifies replication delay in seconds between current instance and its master.",
            ),
            (
                "target delay",
                Some(0),
                "target delay specifies replication delay in seconds between current instance and its future read-replica.",
            ),
        ])
    }

    /// Session number of the connection attempt that produced this handle.
    #[must_use]
    pub const fn session(&self) -> u64 {
        self.session
    }

    /// Every mutation call received, in order, including failed ones.
    #[must_use]
    pub fn set_calls(&self) -> Vec<(String, i64)> {
        self.lock().set_calls.clone()
    }

    /// Number of introspection calls received.
    #[must_use]
    pub fn show_calls(&self) -> usize {
        self.lock().show_calls
    }

    /// Current value of a supported setting.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<Option<i64>> {
        self.lock().settings.get(name).map(|(value, _)| *value)
    }

    /// Make every subsequent introspection call fail.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make mutation calls for `name` fail.
    pub fn fail_set_for(&self, name: &str) {
        self.lock().fail_set_for = Some(name.to_string());
    }

    fn with_session(&self, session: u64) -> Self {
        Self {
            state: Arc::clone(&self.state),
            session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn procedure_error(operation: &'static str, message: &str) -> DataError {
    DataError::QueryFailed {
        operation,
        source: sqlx::Error::Protocol(message.to_string()),
    }
}

#[async_trait]
impl ProcedureClient for FakeInstance {
    async fn show_configuration(&self) -> DataResult<Vec<SettingRow>> {
        let mut state = self.lock();
        state.show_calls += 1;
        if state.fail_reads {
            return Err(procedure_error(
                "rds_show_configuration",
                "introspection unavailable",
            ));
        }
        Ok(state
            .settings
            .iter()
            .map(|(name, (value, description))| SettingRow {
                name: name.clone(),
                value: *value,
                description: description.clone(),
            })
            .collect())
    }

    async fn set_configuration(&self, name: &str, value: i64) -> DataResult<()> {
        let mut state = self.lock();
        state.set_calls.push((name.to_string(), value));
        if state.fail_set_for.as_deref() == Some(name) {
            return Err(procedure_error("rds_set_configuration", "mutation rejected"));
        }
        match state.settings.get_mut(name) {
            Some(entry) => {
                entry.0 = Some(value);
                Ok(())
            }
            None => Err(procedure_error(
                "rds_set_configuration",
                "unsupported configuration name",
            )),
        }
    }
}

/// Connector double that refuses connections until a point in time.
#[derive(Debug, Clone)]
pub struct FakeConnector {
    instance: FakeInstance,
    attempts: Arc<AtomicU64>,
    available_at: Instant,
    latency: Duration,
    stall_from: Option<u64>,
}

impl FakeConnector {
    /// Connector that succeeds immediately.
    #[must_use]
    pub fn new(instance: FakeInstance) -> Self {
        Self {
            instance,
            attempts: Arc::new(AtomicU64::new(0)),
            available_at: Instant::now(),
            latency: Duration::ZERO,
            stall_from: None,
        }
    }

    /// Refuse every attempt that starts before `delay` has elapsed from now.
    #[must_use]
    pub fn available_after(mut self, delay: Duration) -> Self {
        self.available_at = Instant::now() + delay;
        self
    }

    /// Spend `latency` inside every attempt before answering.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Never answer attempt number `attempt` or any later one.
    #[must_use]
    pub const fn stall_from(mut self, attempt: u64) -> Self {
        self.stall_from = Some(attempt);
        self
    }

    /// Number of connection attempts made across all clones.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Handle = FakeInstance;

    async fn connect(&self) -> Result<FakeInstance, sqlx::Error> {
        let session = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        if self.stall_from.is_some_and(|first| session >= first) {
            pending::<()>().await;
        }
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        if started < self.available_at {
            return Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(self.instance.with_session(session))
    }
}
