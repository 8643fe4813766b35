//! Default values and environment variable names for client settings.
//!
//! # Design
//! - Centralize env var names so the loader, CLI, and error details agree.

use std::time::Duration;

/// Environment variable holding the instance endpoint.
pub const ENV_ENDPOINT: &str = "MYSQL_ENDPOINT";
/// Environment variable holding the instance TCP port.
pub const ENV_PORT: &str = "MYSQL_PORT";
/// Environment variable holding the login user.
pub const ENV_USERNAME: &str = "MYSQL_USERNAME";
/// Environment variable holding the login password.
pub const ENV_PASSWORD: &str = "MYSQL_PASSWORD";
/// Environment variable holding the TLS mode.
pub const ENV_TLS: &str = "MYSQL_TLS_CONFIG";
/// Environment variable holding the authentication type.
pub const ENV_AUTHENTICATION_TYPE: &str = "MYSQL_AUTHENTICATION_TYPE";
/// Environment variable holding the connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT: &str = "MYSQL_CONNECT_TIMEOUT";

/// Port used by the driver when none is configured.
pub const DEFAULT_PORT: u16 = 3306;
/// Connection establishment budget when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
