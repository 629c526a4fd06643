//! Configuration
//!
//! Settings are resolved once at startup into a [`NotifyConfig`].
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`GH_NOTIFY_*`)
//! 2. Config file (`~/.config/gh-notify/gh-notify.toml`)
//! 3. Defaults
//!
//! The config file is a flat table keyed like the environment variables.
//! Keys are case-insensitive:
//!
//! ```toml
//! GH_NOTIFY_VIEW_KEY = "enter"
//! gh_notify_cache_duration = "10m"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NotifyError, Result};

pub const ENV_PREFIX: &str = "GH_NOTIFY_";

pub const MARK_ALL_READ_KEY: &str = "GH_NOTIFY_MARK_ALL_READ_KEY";
pub const OPEN_BROWSER_KEY: &str = "GH_NOTIFY_OPEN_BROWSER_KEY";
pub const VIEW_DIFF_KEY: &str = "GH_NOTIFY_VIEW_DIFF_KEY";
pub const VIEW_PATCH_KEY: &str = "GH_NOTIFY_VIEW_PATCH_KEY";
pub const RELOAD_KEY: &str = "GH_NOTIFY_RELOAD_KEY";
pub const MARK_READ_KEY: &str = "GH_NOTIFY_MARK_READ_KEY";
pub const COMMENT_KEY: &str = "GH_NOTIFY_COMMENT_KEY";
pub const TOGGLE_KEY: &str = "GH_NOTIFY_TOGGLE_KEY";
pub const RESIZE_PREVIEW_KEY: &str = "GH_NOTIFY_RESIZE_PREVIEW_KEY";
pub const VIEW_KEY: &str = "GH_NOTIFY_VIEW_KEY";
pub const TOGGLE_PREVIEW_KEY: &str = "GH_NOTIFY_TOGGLE_PREVIEW_KEY";
pub const TOGGLE_HELP_KEY: &str = "GH_NOTIFY_TOGGLE_HELP_KEY";
pub const DEBUG_MODE: &str = "GH_NOTIFY_DEBUG_MODE";
pub const CACHE_ENABLED: &str = "GH_NOTIFY_CACHE_ENABLED";
pub const CACHE_DURATION: &str = "GH_NOTIFY_CACHE_DURATION";
pub const API_URL: &str = "GH_NOTIFY_API_URL";

pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Key chords (fzf-style tokens) for the interactive actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub mark_all_read: String,
    pub open_browser: String,
    pub view_diff: String,
    pub view_patch: String,
    pub reload: String,
    pub mark_read: String,
    pub comment: String,
    pub toggle: String,
    pub resize_preview: String,
    pub view: String,
    pub toggle_preview: String,
    pub toggle_help: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            mark_all_read: "ctrl-a".to_string(),
            open_browser: "ctrl-b".to_string(),
            view_diff: "ctrl-d".to_string(),
            view_patch: "ctrl-p".to_string(),
            reload: "ctrl-r".to_string(),
            mark_read: "ctrl-t".to_string(),
            comment: "ctrl-x".to_string(),
            toggle: "ctrl-y".to_string(),
            resize_preview: "btab".to_string(),
            view: "enter".to_string(),
            toggle_preview: "tab".to_string(),
            toggle_help: "?".to_string(),
        }
    }
}

/// Resolved configuration, built once and passed by reference
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyConfig {
    pub keys: KeyBindings,
    pub debug: bool,
    pub cache_enabled: bool,
    pub cache_duration: Duration,
    pub api_url: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            debug: false,
            cache_enabled: true,
            cache_duration: DEFAULT_CACHE_DURATION,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl NotifyConfig {
    /// Get the config directory path
    ///
    /// `$XDG_CONFIG_HOME/gh-notify/` when set, otherwise `~/.config/gh-notify/`
    /// on every platform
    pub fn config_dir() -> PathBuf {
        config_dir_from(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        )
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("gh-notify.toml")
    }

    /// Load from the default file and the process environment
    pub fn load() -> Result<Self> {
        let mut values = read_file_values(&Self::config_path())?;
        values.extend(env_values(std::env::vars()));
        Self::from_values(&values)
    }

    /// Resolve a key→value map, falling back to defaults for absent keys
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let key = |name: &str, default: &str| -> String {
            values
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        let d = &defaults.keys;
        let keys = KeyBindings {
            mark_all_read: key(MARK_ALL_READ_KEY, &d.mark_all_read),
            open_browser: key(OPEN_BROWSER_KEY, &d.open_browser),
            view_diff: key(VIEW_DIFF_KEY, &d.view_diff),
            view_patch: key(VIEW_PATCH_KEY, &d.view_patch),
            reload: key(RELOAD_KEY, &d.reload),
            mark_read: key(MARK_READ_KEY, &d.mark_read),
            comment: key(COMMENT_KEY, &d.comment),
            toggle: key(TOGGLE_KEY, &d.toggle),
            resize_preview: key(RESIZE_PREVIEW_KEY, &d.resize_preview),
            view: key(VIEW_KEY, &d.view),
            toggle_preview: key(TOGGLE_PREVIEW_KEY, &d.toggle_preview),
            toggle_help: key(TOGGLE_HELP_KEY, &d.toggle_help),
        };

        let debug = match values.get(DEBUG_MODE) {
            Some(v) => parse_bool(DEBUG_MODE, v)?,
            None => defaults.debug,
        };
        let cache_enabled = match values.get(CACHE_ENABLED) {
            Some(v) => parse_bool(CACHE_ENABLED, v)?,
            None => defaults.cache_enabled,
        };
        let cache_duration = match values.get(CACHE_DURATION) {
            Some(v) => parse_duration(v).map_err(|reason| NotifyError::Config {
                reason: format!("{}: {}", CACHE_DURATION, reason),
            })?,
            None => defaults.cache_duration,
        };
        let api_url = key(API_URL, DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            keys,
            debug,
            cache_enabled,
            cache_duration,
            api_url,
        })
    }
}

/// Flatten the config file into uppercase keys
///
/// A missing file yields an empty map; an unreadable or malformed one is an error.
pub fn read_file_values(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path).map_err(|e| NotifyError::Config {
        reason: format!("Failed to read config file: {}", e),
    })?;
    parse_file_values(&content)
}

/// Parse config file content into uppercase keys
pub fn parse_file_values(content: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(content).map_err(|e| NotifyError::Config {
        reason: format!("Failed to parse config file: {}", e),
    })?;

    let mut values = HashMap::new();
    for (name, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            other => {
                return Err(NotifyError::Config {
                    reason: format!("'{}' must be a string, number or boolean, got {}", name, other.type_str()),
                })
            }
        };
        values.insert(name.to_ascii_uppercase(), value);
    }
    Ok(values)
}

/// Keep only `GH_NOTIFY_*` variables
pub fn env_values(vars: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(NotifyError::Config {
            reason: format!("{}: expected a boolean, got '{}'", name, other),
        }),
    }
}

/// Parse `90s`, `5m`, `1h30m`, `250ms` or a bare number of seconds
fn config_dir_from(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let base = match xdg_config_home {
        Some(dir) if dir.is_absolute() => dir,
        _ => home.unwrap_or_else(|| PathBuf::from(".")).join(".config"),
    };
    base.join("gh-notify")
}

pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in '{}'", input))?;
        if num_len == 0 {
            return Err(format!("invalid duration '{}'", input));
        }
        let number: f64 = rest[..num_len]
            .parse()
            .map_err(|_| format!("invalid number in '{}'", input))?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let secs = match &rest[..unit_len] {
            "ms" => number / 1000.0,
            "s" => number,
            "m" => number * 60.0,
            "h" => number * 3600.0,
            unit => return Err(format!("unknown unit '{}' in '{}'", unit, input)),
        };
        rest = &rest[unit_len..];
        let part = Duration::try_from_secs_f64(secs)
            .map_err(|_| format!("duration out of range in '{}'", input))?;
        total = total
            .checked_add(part)
            .ok_or_else(|| format!("duration out of range in '{}'", input))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = NotifyConfig::from_values(&HashMap::new()).unwrap();
        assert_eq!(config, NotifyConfig::default());
        assert_eq!(config.keys.view, "enter");
        assert_eq!(config.keys.toggle_help, "?");
        assert_eq!(config.cache_duration, Duration::from_secs(300));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut merged = parse_file_values(
            r#"
gh_notify_view_key = "ctrl-v"
GH_NOTIFY_DEBUG_MODE = true
GH_NOTIFY_CACHE_DURATION = "10m"
"#,
        )
        .unwrap();
        merged.extend(env_values(vec![
            ("GH_NOTIFY_VIEW_KEY".to_string(), "ctrl-o".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ]));

        let config = NotifyConfig::from_values(&merged).unwrap();
        assert_eq!(config.keys.view, "ctrl-o");
        assert!(config.debug);
        assert_eq!(config.cache_duration, Duration::from_secs(600));
        assert!(!merged.contains_key("HOME"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = NotifyConfig::from_values(&values(&[(CACHE_ENABLED, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(CACHE_ENABLED));
    }

    #[test]
    fn test_cache_disabled() {
        let config = NotifyConfig::from_values(&values(&[(CACHE_ENABLED, "false")])).unwrap();
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let config =
            NotifyConfig::from_values(&values(&[(API_URL, "http://localhost:8080/")])).unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_duration("90"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("1.5h"), Ok(Duration::from_secs(5400)));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5").is_ok());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("10 ").is_ok());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        let huge = "99999999999999999999h";
        assert!(parse_duration(huge).unwrap_err().contains("out of range"));
        assert!(parse_duration("18446744073709551615s1s").is_err());

        let err = NotifyConfig::from_values(&values(&[(CACHE_DURATION, huge)])).unwrap_err();
        assert!(matches!(err, NotifyError::Config { .. }));
        assert!(err.to_string().contains(CACHE_DURATION));
    }

    #[test]
    fn test_config_dir_under_dot_config() {
        let home = PathBuf::from("/home/octo");
        assert_eq!(
            config_dir_from(None, Some(home.clone())),
            PathBuf::from("/home/octo/.config/gh-notify")
        );
        assert_eq!(
            config_dir_from(Some(PathBuf::from("/xdg")), Some(home.clone())),
            PathBuf::from("/xdg/gh-notify")
        );
        assert_eq!(
            config_dir_from(Some(PathBuf::from("relative")), Some(home)),
            PathBuf::from("/home/octo/.config/gh-notify")
        );
    }

    #[test]
    fn test_malformed_file() {
        assert!(parse_file_values("GH_NOTIFY_VIEW_KEY = ").is_err());
        assert!(parse_file_values("[section]\nkey = 1").is_err());
    }

    #[test]
    fn test_config_path_contains_name() {
        let path = NotifyConfig::config_path();
        assert!(path.to_string_lossy().ends_with("gh-notify.toml"));
    }
}
