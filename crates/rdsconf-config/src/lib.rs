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

//! Connection settings for the managed MySQL instance.
//!
//! Layout: `model.rs` (typed settings and the resolved `ClientContext`),
//! `loader.rs` (environment layering), `validate.rs` (field parsers),
//! `defaults.rs` (built-in defaults and environment variable names).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{EnvSource, ProcessEnv};
pub use model::{AuthenticationType, ClientContext, ClientSettings, TlsMode};
