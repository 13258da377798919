//! Launch configuration shared by all four entry points.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Options handed to the [`Launcher`](crate::ports::Launcher) untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LaunchOptions {
    /// Working directory for the child; inherits the host's when `None`.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables for the child.
    pub env: BTreeMap<String, String>,
    /// Start the child with an empty environment before applying `env`.
    pub env_clear: bool,
    /// Suppress the console window on Windows. Ignored elsewhere.
    pub hide_window: bool,
    /// Kill the child after this many milliseconds.
    #[serde(rename = "timeout")]
    pub timeout_ms: Option<u64>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            env: BTreeMap::new(),
            env_clear: false,
            hide_window: true,
            timeout_ms: None,
        }
    }
}

impl LaunchOptions {
    /// The configured timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Which captured streams are mirrored to the host while capturing.
///
/// Deserializes from a bool (`true` mirrors both) or from a map with
/// optional `stdout` / `stderr` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "DebugRepr")]
pub struct DebugMirror {
    /// Mirror standard output.
    pub stdout: bool,
    /// Mirror standard error.
    pub stderr: bool,
}

impl DebugMirror {
    /// Mirror both streams.
    pub const BOTH: Self = Self { stdout: true, stderr: true };
    /// Mirror nothing.
    pub const NONE: Self = Self { stdout: false, stderr: false };

    /// Whether any stream is mirrored.
    #[must_use]
    pub fn any(self) -> bool {
        self.stdout || self.stderr
    }
}

impl From<bool> for DebugMirror {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::BOTH
        } else {
            Self::NONE
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DebugRepr {
    Flag(bool),
    Streams {
        #[serde(default)]
        stdout: bool,
        #[serde(default)]
        stderr: bool,
    },
}

impl From<DebugRepr> for DebugMirror {
    fn from(repr: DebugRepr) -> Self {
        match repr {
            DebugRepr::Flag(enabled) => enabled.into(),
            DebugRepr::Streams { stdout, stderr } => Self { stdout, stderr },
        }
    }
}

/// Full configuration accepted by the entry points.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SpawnOptions {
    /// Launcher passthrough options.
    #[serde(flatten)]
    pub launch: LaunchOptions,
    /// Debug mirroring selection.
    pub debug: DebugMirror,
}

impl SpawnOptions {
    /// Options with the given mirroring and default launcher settings.
    #[must_use]
    pub fn with_debug(debug: impl Into<DebugMirror>) -> Self {
        Self { debug: debug.into(), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_window_defaults_to_true() {
        assert!(LaunchOptions::default().hide_window);
        assert!(SpawnOptions::default().launch.hide_window);
    }

    #[test]
    fn debug_from_bool() {
        assert_eq!(DebugMirror::from(true), DebugMirror::BOTH);
        assert_eq!(DebugMirror::from(false), DebugMirror::NONE);
        assert!(!DebugMirror::NONE.any());
    }

    #[test]
    fn deserializes_debug_flag_and_selector() {
        let opts: SpawnOptions = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert_eq!(opts.debug, DebugMirror::BOTH);

        let opts: SpawnOptions = serde_json::from_str(r#"{"debug": {"stderr": true}}"#).unwrap();
        assert_eq!(opts.debug, DebugMirror { stdout: false, stderr: true });
    }

    #[test]
    fn deserializes_launch_passthrough() {
        let opts: SpawnOptions = serde_json::from_str(
            r#"{"cwd": "/tmp", "env": {"A": "1"}, "hideWindow": false, "timeout": 250}"#,
        )
        .unwrap();
        assert_eq!(opts.launch.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(opts.launch.env.get("A").map(String::as_str), Some("1"));
        assert!(!opts.launch.hide_window);
        assert_eq!(opts.launch.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(opts.debug, DebugMirror::NONE);
    }
}
