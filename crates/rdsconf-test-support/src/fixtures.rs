//! Docker discovery for suites that need a disposable MySQL container.

use std::path::Path;
use std::process::Command;

/// Set to `1`, `true`, or `yes` to skip container-backed tests even when a
/// daemon is reachable.
pub const SKIP_DOCKER_ENV: &str = "RDSCONF_SKIP_DOCKER_TESTS";

const DEFAULT_SOCKETS: &[&str] = &["/var/run/docker.sock", "/run/docker.sock"];

/// Returns `true` if a Docker daemon is reachable and container tests are not
/// disabled through [`SKIP_DOCKER_ENV`].
#[must_use]
pub fn docker_available() -> bool {
    docker_available_with(
        std::env::var(SKIP_DOCKER_ENV).ok(),
        std::env::var("DOCKER_HOST").ok(),
    )
}

/// Returns `true` when `test` has to skip, after noting why on stderr.
#[must_use]
pub fn skip_without_docker(test: &str) -> bool {
    if docker_available() {
        return false;
    }
    eprintln!("skipping {test}: docker daemon unreachable or {SKIP_DOCKER_ENV} set");
    true
}

fn docker_available_with(skip: Option<String>, host: Option<String>) -> bool {
    if skip.is_some_and(|value| is_truthy(&value)) {
        return false;
    }

    match host.as_deref().map(str::trim).filter(|host| !host.is_empty()) {
        Some(host) => host
            .strip_prefix("unix://")
            .is_none_or(|path| Path::new(path).exists()),
        None => {
            DEFAULT_SOCKETS.iter().any(|socket| Path::new(socket).exists())
                || Command::new("docker")
                    .args(["info", "--format", "{{.ServerVersion}}"])
                    .output()
                    .is_ok_and(|output| output.status.success())
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
