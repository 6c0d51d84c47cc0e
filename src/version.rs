//! Build identification: package version plus the git state vergen captured.
//!
//! Surfaces in three places: the `/health` body, the startup log line and the
//! `User-Agent` sent to the Subsonic server.

use std::fmt;

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder for git metadata when the crate is built outside a checkout.
const UNKNOWN: &str = "unknown";

/// Identity of the running binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    /// Short commit hash (7 characters).
    pub commit: &'static str,
    pub dirty: bool,
    pub built_at: Option<&'static str>,
}

impl BuildInfo {
    /// Metadata embedded by `build.rs`.
    pub fn current() -> Self {
        Self::from_parts(
            PKG_VERSION,
            option_env!("VERGEN_GIT_BRANCH"),
            option_env!("VERGEN_GIT_SHA"),
            option_env!("VERGEN_GIT_DIRTY") == Some("true"),
            option_env!("VERGEN_BUILD_TIMESTAMP"),
        )
    }

    fn from_parts(
        version: &'static str,
        branch: Option<&'static str>,
        sha: Option<&'static str>,
        dirty: bool,
        built_at: Option<&'static str>,
    ) -> Self {
        // vergen emits placeholder values when git is unavailable
        let known = |value: Option<&'static str>| {
            value.filter(|v| !v.is_empty() && !v.starts_with("VERGEN_"))
        };
        let commit = known(sha).unwrap_or(UNKNOWN);
        Self {
            version,
            branch: known(branch).unwrap_or(UNKNOWN),
            commit: commit.get(..7).unwrap_or(commit),
            dirty,
            built_at: known(built_at),
        }
    }
}

/// `{version}+{branch}.{commit}`, with `.dirty` appended for modified trees.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.branch, self.commit)?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Full version string, e.g. `0.1.0+main.abc1234`.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}

/// `User-Agent` presented to the upstream server.
pub fn user_agent() -> String {
    format!("huginn/{PKG_VERSION}")
}
