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

//! Data access for the managed instance: the cached connection, the two
//! configuration procedures, and the snapshot/desired-state models.

pub mod connection;
pub mod error;
pub mod model;
pub mod procedures;
pub mod reader;
pub mod writer;

pub use connection::{ConnectionManager, Connector, MySqlConnector};
pub use error::{DataError, Result as DataResult};
pub use model::{ConfigurationSnapshot, DesiredConfiguration, Setting, SettingRow};
pub use procedures::ProcedureClient;
pub use reader::read_configuration;
pub use writer::apply_configuration;
