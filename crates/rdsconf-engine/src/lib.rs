#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unused, unreachable_pub)]

//! Reconciliation of declared RDS MySQL configuration against a live instance.
//!
//! Layout: `validator.rs` (plan-time name checks), `resource.rs` (managed
//! resource lifecycle), `data_source.rs` (read-only listing),
//! `diagnostics.rs` (operator-facing feedback), `error.rs` (error taxonomy).

use std::sync::Arc;

use rdsconf_config::ClientContext;
use rdsconf_data::{ConnectionManager, MySqlConnector};

pub mod data_source;
pub mod diagnostics;
pub mod error;
pub mod resource;
pub mod validator;

pub use data_source::{ConfigurationDataSource, DataSourceState};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{EngineError, EngineResult};
pub use resource::{ConfigurationResource, RESOURCE_ID, ResourceState, SettingState};
pub use validator::validate_desired;

/// Connection manager shared by every resource and data source of a process.
pub type SharedConnections<C> = Arc<ConnectionManager<C>>;

/// Shared MySQL connections for a resolved client context.
#[must_use]
pub fn mysql_connections(context: &ClientContext) -> SharedConnections<MySqlConnector> {
    Arc::new(ConnectionManager::for_context(context))
}
