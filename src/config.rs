use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::keymap::{KeyBinding, KeyMap};
use crate::storage::{find_project_root, PROJECT_DIR_NAME};
use crate::theme::{Theme, COLOR_SCHEMES};

// ---------------------------------------------------------------------------
// Top-level Config: all fields have defaults, unknown keys silently ignored.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub default_env: Option<String>,
    pub color_scheme: String,
    pub log: LogConfig,
    pub ui: UiConfig,
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Log file. Defaults to a dated file under `<data_dir>/log`.
    pub path: Option<PathBuf>,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub sidebar_width: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub quit: String,
    pub next_pane: String,
    pub prev_pane: String,
    pub next_view: Option<String>,
    pub prev_view: Option<String>,
    pub help: String,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const APP_NAME: &str = "courier";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_DATA_HOME") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir).join(APP_NAME);
        }
    }
    match env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_NAME),
        _ => PathBuf::from(PROJECT_DIR_NAME),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_env: None,
            color_scheme: "default".to_string(),
            log: LogConfig::default(),
            ui: UiConfig::default(),
            keys: KeysConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            format: LogFormat::Text,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { sidebar_width: 30 }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            quit: "ctrl+q".to_string(),
            next_pane: "tab".to_string(),
            prev_pane: "shift+tab".to_string(),
            next_view: None,
            prev_view: None,
            help: "f1".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay config: partial deserialization for field-level merging.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayConfig {
    data_dir: Option<PathBuf>,
    default_env: Option<String>,
    color_scheme: Option<String>,
    log: OverlayLogConfig,
    ui: OverlayUiConfig,
    keys: OverlayKeysConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayLogConfig {
    level: Option<String>,
    path: Option<PathBuf>,
    format: Option<LogFormat>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayUiConfig {
    sidebar_width: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayKeysConfig {
    quit: Option<String>,
    next_pane: Option<String>,
    prev_pane: Option<String>,
    next_view: Option<String>,
    prev_view: Option<String>,
    help: Option<String>,
}

impl Config {
    /// Apply overlay values over self. Only `Some` fields are overridden.
    fn merge(mut self, overlay: OverlayConfig) -> Self {
        if let Some(v) = overlay.data_dir {
            self.data_dir = v;
        }
        if let Some(v) = overlay.default_env {
            self.default_env = Some(v);
        }
        if let Some(v) = overlay.color_scheme {
            self.color_scheme = v;
        }
        if let Some(v) = overlay.log.level {
            self.log.level = v;
        }
        if let Some(v) = overlay.log.path {
            self.log.path = Some(v);
        }
        if let Some(v) = overlay.log.format {
            self.log.format = v;
        }
        if let Some(v) = overlay.ui.sidebar_width {
            self.ui.sidebar_width = v;
        }
        if let Some(v) = overlay.keys.quit {
            self.keys.quit = v;
        }
        if let Some(v) = overlay.keys.next_pane {
            self.keys.next_pane = v;
        }
        if let Some(v) = overlay.keys.prev_pane {
            self.keys.prev_pane = v;
        }
        if let Some(v) = overlay.keys.next_view {
            self.keys.next_view = Some(v);
        }
        if let Some(v) = overlay.keys.prev_view {
            self.keys.prev_view = Some(v);
        }
        if let Some(v) = overlay.keys.help {
            self.keys.help = v;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir).join(APP_NAME).join(CONFIG_FILE_NAME));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn project_config_path() -> Option<PathBuf> {
    let root = find_project_root()?;
    let path = root.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tilde expansion
// ---------------------------------------------------------------------------

fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix('~') {
            if rest.is_empty() || rest.starts_with('/') {
                if let Ok(home) = env::var("HOME") {
                    return PathBuf::from(home).join(rest.trim_start_matches('/'));
                }
            }
        }
    }
    path.to_path_buf()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("{}", .messages.join("\n"))]
pub struct ConfigError {
    pub messages: Vec<String>,
}

impl ConfigError {
    fn single(message: String) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

fn parse_key(field: &str, value: &str, errors: &mut Vec<String>) -> Option<KeyBinding> {
    match value.parse::<KeyBinding>() {
        Ok(key) => Some(key),
        Err(e) => {
            errors.push(format!("config error: keys.{} = \"{}\": {}", field, value, e));
            None
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !(20..=80).contains(&self.ui.sidebar_width) {
            errors.push(format!(
                "config error: ui.sidebar_width = {} is out of range (20..=80)",
                self.ui.sidebar_width
            ));
        }
        if Theme::from_name(&self.color_scheme).is_none() {
            errors.push(format!(
                "config error: color_scheme = \"{}\" is unknown (expected one of: {})",
                self.color_scheme,
                COLOR_SCHEMES.join(", ")
            ));
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "config error: log.level = \"{}\" is unknown (expected one of: {})",
                self.log.level,
                LOG_LEVELS.join(", ")
            ));
        }
        if let Some(ref name) = self.default_env {
            if name.trim().is_empty() {
                errors.push("config error: default_env must not be empty".to_string());
            }
        }
        if let Err(e) = self.key_map() {
            errors.extend(e.messages);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { messages: errors })
        }
    }

    /// Parsed key bindings. Every unparsable binding is reported.
    pub fn key_map(&self) -> Result<KeyMap, ConfigError> {
        let mut errors = Vec::new();
        let keys = &self.keys;
        let quit = parse_key("quit", &keys.quit, &mut errors);
        let next_pane = parse_key("next_pane", &keys.next_pane, &mut errors);
        let prev_pane = parse_key("prev_pane", &keys.prev_pane, &mut errors);
        let help = parse_key("help", &keys.help, &mut errors);
        let next_view = keys
            .next_view
            .as_deref()
            .map(|v| parse_key("next_view", v, &mut errors));
        let prev_view = keys
            .prev_view
            .as_deref()
            .map(|v| parse_key("prev_view", v, &mut errors));

        match (quit, next_pane, prev_pane, help) {
            (Some(quit), Some(next_pane), Some(prev_pane), Some(help)) if errors.is_empty() => {
                Ok(KeyMap {
                    quit,
                    next_pane,
                    prev_pane,
                    next_view: next_view.flatten(),
                    prev_view: prev_view.flatten(),
                    help,
                })
            }
            _ => Err(ConfigError { messages: errors }),
        }
    }

    /// Falls back to the default scheme; `validate` rejects unknown names.
    pub fn theme(&self) -> Theme {
        Theme::from_name(&self.color_scheme).unwrap_or_default()
    }

    /// Expand tilde in all path fields. Called after merging, before validation.
    fn expand_paths(&mut self) {
        self.data_dir = expand_tilde(&self.data_dir);
        if let Some(ref path) = self.log.path {
            self.log.path = Some(expand_tilde(path));
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_overlay(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::single(format!(
            "config error: could not read \"{}\": {}",
            path.display(),
            e
        ))
    })?;
    toml::from_str(&content).map_err(|e| {
        ConfigError::single(format!(
            "config error: failed to parse \"{}\": {}",
            path.display(),
            e
        ))
    })
}

fn load_layers(
    base: Option<&Path>,
    base_required: bool,
    project: Option<&Path>,
) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(path) = base {
        if base_required || path.exists() {
            config = config.merge(load_overlay(path)?);
        }
    }
    if let Some(path) = project {
        config = config.merge(load_overlay(path)?);
    }

    config.expand_paths();
    config.validate()?;
    Ok(config)
}

/// Load configuration from the given file (or the default location) and the
/// project overlay. A missing default file is skipped; a missing explicit
/// file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let project = project_config_path();
    match explicit {
        Some(path) => load_layers(Some(&expand_tilde(path)), true, project.as_deref()),
        None => {
            let default = default_config_path();
            load_layers(default.as_deref(), false, project.as_deref())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.default_env.is_none());
        assert_eq!(config.color_scheme, "default");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(config.log.path.is_none());
        assert_eq!(config.ui.sidebar_width, 30);
        assert!(config.keys.next_view.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_key_map_matches_builtin() {
        assert_eq!(Config::default().key_map().unwrap(), KeyMap::default());
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml_str = r#"
data_dir = "/srv/courier"
default_env = "Staging"
color_scheme = "mono"

[log]
level = "debug"
path = "/tmp/courier.log"
format = "json"

[ui]
sidebar_width = 40

[keys]
quit = "ctrl+x"
next_view = "ctrl+n"
prev_view = "ctrl+p"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/courier"));
        assert_eq!(config.default_env.as_deref(), Some("Staging"));
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.ui.sidebar_width, 40);
        assert!(config.validate().is_ok());

        let keys = config.key_map().unwrap();
        assert_eq!(keys.quit, KeyBinding::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(
            keys.next_view,
            Some(KeyBinding::new(KeyCode::Char('n'), KeyModifiers::CONTROL))
        );
        assert_eq!(keys.next_pane, KeyBinding::plain(KeyCode::Tab));
    }

    #[test]
    fn test_parse_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ui.sidebar_width, 30);
        assert_eq!(config.keys.quit, "ctrl+q");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let toml_str = r#"
color_scheme = "mono"
unknown_field = "hello"

[unknown_section]
key = "value"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.color_scheme, "mono");
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let result: Result<Config, _> = toml::from_str("[log]\nformat = \"xml\"\n");
        assert!(result.is_err());
    }

    // -- Merge tests --

    #[test]
    fn test_merge_empty_overlay() {
        let merged = Config::default().merge(OverlayConfig::default());
        assert_eq!(merged.ui.sidebar_width, 30);
        assert_eq!(merged.color_scheme, "default");
    }

    #[test]
    fn test_merge_field_level() {
        let mut base = Config::default();
        base.log.level = "warn".into();
        base.log.path = Some(PathBuf::from("/var/log/courier.log"));

        // Project overlay only overrides the level.
        let overlay: OverlayConfig = toml::from_str("[log]\nlevel = \"trace\"\n").unwrap();
        let merged = base.merge(overlay);
        assert_eq!(merged.log.level, "trace");
        assert_eq!(merged.log.path, Some(PathBuf::from("/var/log/courier.log")));
    }

    // -- Validation tests --

    #[test]
    fn test_validate_collects_every_problem() {
        let mut config = Config::default();
        config.ui.sidebar_width = 5;
        config.color_scheme = "neon".into();
        config.log.level = "loud".into();
        config.keys.quit = "hyper+q".into();
        config.keys.next_view = Some("".into());

        let err = config.validate().unwrap_err();
        assert_eq!(err.messages.len(), 5);
        let all = err.to_string();
        assert!(all.contains("ui.sidebar_width = 5"));
        assert!(all.contains("color_scheme = \"neon\""));
        assert!(all.contains("log.level = \"loud\""));
        assert!(all.contains("keys.quit"));
        assert!(all.contains("keys.next_view"));
    }

    #[test]
    fn test_validate_boundary_values() {
        let mut config = Config::default();
        config.ui.sidebar_width = 20;
        assert!(config.validate().is_ok());
        config.ui.sidebar_width = 80;
        assert!(config.validate().is_ok());
        config.ui.sidebar_width = 81;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_color_scheme_case_insensitive() {
        let mut config = Config::default();
        config.color_scheme = "MONO".into();
        assert!(config.validate().is_ok());
        assert_eq!(config.theme(), Theme::mono());
    }

    // -- Loading tests --

    #[test]
    fn test_load_layers_project_overrides_base() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("config.toml");
        fs::write(
            &base,
            "default_env = \"dev\"\n[ui]\nsidebar_width = 50\n",
        )
        .unwrap();
        let project = tmp.path().join("project.toml");
        fs::write(&project, "[ui]\nsidebar_width = 25\n").unwrap();

        let config = load_layers(Some(&base), true, Some(&project)).unwrap();
        assert_eq!(config.ui.sidebar_width, 25);
        assert_eq!(config.default_env.as_deref(), Some("dev"));
    }

    #[test]
    fn test_missing_default_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        let config = load_layers(Some(&missing), false, None).unwrap();
        assert_eq!(config.ui.sidebar_width, 30);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = load_layers(Some(&missing), true, None).unwrap_err();
        assert!(err.messages[0].contains("could not read"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[ui\nsidebar_width = ").unwrap();
        let err = load_layers(Some(&path), true, None).unwrap_err();
        assert!(err.messages[0].contains("failed to parse"));
        assert!(err.messages[0].contains("bad.toml"));
    }

    #[test]
    fn test_validation_runs_after_merge() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "color_scheme = \"neon\"\n").unwrap();
        assert!(load_layers(Some(&path), true, None).is_err());
    }

    // -- Tilde expansion tests --

    #[test]
    fn test_expand_tilde() {
        let home = env::var("HOME").unwrap_or_else(|_| "/home/test".into());
        let expanded = expand_tilde(Path::new("~/notes/courier"));
        if env::var("HOME").is_ok() {
            assert_eq!(expanded, PathBuf::from(format!("{}/notes/courier", home)));
        }
    }

    #[test]
    fn test_expand_tilde_leaves_other_paths() {
        let path = Path::new("/absolute/path");
        assert_eq!(expand_tilde(path), path);
        let user = Path::new("~other/dir");
        assert_eq!(expand_tilde(user), user);
    }
}
