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

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (docker discovery and skips), mysql.rs (docker-backed fixture), mocks.rs (in-memory instance).

pub mod fixtures;
pub mod mocks;
pub mod mysql;

pub use fixtures::{SKIP_DOCKER_ENV, docker_available, skip_without_docker};
pub use mocks::{FakeConnector, FakeInstance};
pub use mysql::{MySqlInstance, start_mysql};
