//! Process configuration.
//!
//! Configuration comes from command-line flags with environment-variable
//! fallbacks (precedence: explicit flag > environment > default). The values
//! are collected once at startup into an immutable [`Config`] and never change
//! for the lifetime of the process.

use crate::error::{HuedialError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default evdev node when none is configured.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/input/event0";

/// Default primary toggle code: KEY_F17 (see `evtest` output for the knob).
pub const DEFAULT_TOGGLE_CODE: u16 = 187;

/// Default per-request timeout against the bridge, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Which generation of the bridge HTTP API to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGeneration {
    /// Flat per-group API addressed by small integer ids
    V1,
    /// Resource-graph API addressed by opaque resource ids
    V2,
}

impl ApiGeneration {
    /// Parse the `--api` flag value.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(HuedialError::config(format!(
                "unknown API generation '{other}' (expected 'v1' or 'v2')"
            ))),
        }
    }
}

/// Immutable process configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bridge host or IP address
    pub host: String,
    /// v1 username / v2 application key
    pub username: String,
    /// Target light group: small integer id for v1, resource id for v2
    pub group: String,
    /// Which bridge API generation to speak
    pub api: ApiGeneration,
    /// Raw input code bound to toggle-power
    pub toggle_code: u16,
    /// Path to the evdev input node
    pub device_path: PathBuf,
    /// Ordered scene identifiers; empty disables scene features
    pub scenes: Vec<String>,
    /// Per-request timeout for bridge calls
    pub request_timeout: Duration,
}

/// Parse the comma-separated scene id list from configuration.
///
/// An empty value yields an empty list, which disables scene rotation and the
/// dynamics toggle. Surrounding whitespace on each id is trimmed; empty
/// segments are dropped.
pub fn parse_scenes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scene_list_disables_scenes() {
        assert!(parse_scenes("").is_empty());
        assert!(parse_scenes("  ").is_empty());
    }

    #[test]
    fn scene_list_splits_and_trims() {
        assert_eq!(
            parse_scenes("abc, def ,ghi"),
            vec!["abc".to_string(), "def".to_string(), "ghi".to_string()]
        );
    }

    #[test]
    fn scene_list_drops_empty_segments() {
        assert_eq!(parse_scenes("abc,,def,"), vec!["abc", "def"]);
    }

    #[test]
    fn api_generation_parses_known_values() {
        assert_eq!(ApiGeneration::parse("v1").unwrap(), ApiGeneration::V1);
        assert_eq!(ApiGeneration::parse("v2").unwrap(), ApiGeneration::V2);
        assert!(ApiGeneration::parse("v3").is_err());
    }
}
