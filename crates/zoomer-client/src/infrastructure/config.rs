//! TOML-based configuration for the client.
//!
//! Reads and writes `ClientConfig` from `$ZOOMER_CONFIG` when set, otherwise
//! from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\zoomer\client.toml`
//! - Linux:    `~/.config/zoomer/client.toml`
//! - macOS:    `~/Library/Application Support/zoomer/client.toml`
//!
//! ```toml
//! [client]
//! log_level = "info"
//! show_restriction_toasts = true
//!
//! [network]
//! server_address = "127.0.0.1:25565"
//! reconnect_interval_secs = 5
//!
//! [options]
//! zoom_divisor = 4.0
//! cinematic_camera = "off"
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section and
//! a missing key all fall back to the values shown above.  The `[options]`
//! table holds the user's own option values; server restrictions are layered
//! over them at runtime and never written back.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zoomer_core::{
    CinematicCamera, OptionId, OverrideValue, SpyglassDependency, ZoomDivisorBounds, ZoomOverlay,
};

use crate::infrastructure::network::ClientConnectionConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "ZOOMER_CONFIG";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is not usable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub options: OptionsSection,
}

/// General client behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSection {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether acknowledgement notices are shown.
    #[serde(default = "default_true")]
    pub show_restriction_toasts: bool,
}

/// Server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSection {
    #[serde(default = "default_server_address")]
    pub server_address: String,
    #[serde(default = "default_reconnect_interval_secs")]
    pub reconnect_interval_secs: u64,
}

/// The user's own option values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionsSection {
    #[serde(default = "default_true")]
    pub zoom_scrolling: bool,
    #[serde(default = "default_true")]
    pub extra_key_binds: bool,
    #[serde(default = "default_cinematic_camera")]
    pub cinematic_camera: CinematicCamera,
    #[serde(default = "default_true")]
    pub reduce_sensitivity: bool,
    #[serde(default = "default_zoom_divisor")]
    pub zoom_divisor: f64,
    #[serde(default = "default_minimum_zoom_divisor")]
    pub minimum_zoom_divisor: f64,
    #[serde(default = "default_maximum_zoom_divisor")]
    pub maximum_zoom_divisor: f64,
    #[serde(default = "default_spyglass_dependency")]
    pub spyglass_dependency: SpyglassDependency,
    #[serde(default = "default_zoom_overlay")]
    pub zoom_overlay: ZoomOverlay,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_server_address() -> String {
    "127.0.0.1:25565".to_string()
}
fn default_reconnect_interval_secs() -> u64 {
    5
}
fn default_cinematic_camera() -> CinematicCamera {
    CinematicCamera::Off
}
fn default_zoom_divisor() -> f64 {
    4.0
}
fn default_minimum_zoom_divisor() -> f64 {
    1.0
}
fn default_maximum_zoom_divisor() -> f64 {
    50.0
}
fn default_spyglass_dependency() -> SpyglassDependency {
    SpyglassDependency::Off
}
fn default_zoom_overlay() -> ZoomOverlay {
    ZoomOverlay::Off
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            show_restriction_toasts: default_true(),
        }
    }
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            reconnect_interval_secs: default_reconnect_interval_secs(),
        }
    }
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            zoom_scrolling: default_true(),
            extra_key_binds: default_true(),
            cinematic_camera: default_cinematic_camera(),
            reduce_sensitivity: default_true(),
            zoom_divisor: default_zoom_divisor(),
            minimum_zoom_divisor: default_minimum_zoom_divisor(),
            maximum_zoom_divisor: default_maximum_zoom_divisor(),
            spyglass_dependency: default_spyglass_dependency(),
            zoom_overlay: default_zoom_overlay(),
        }
    }
}

// ── Derived runtime settings ──────────────────────────────────────────────────

impl ClientConfig {
    /// Builds the network settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `server_address` is not a socket
    /// address.
    pub fn connection_config(&self) -> Result<ClientConnectionConfig, ConfigError> {
        let server_addr: SocketAddr =
            self.network
                .server_address
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    field: "network.server_address",
                    reason: e.to_string(),
                })?;
        Ok(ClientConnectionConfig {
            server_addr,
            reconnect_interval: Duration::from_secs(self.network.reconnect_interval_secs),
        })
    }

    /// The user's own zoom divisor range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] unless `0 < minimum <= maximum`.
    pub fn user_divisor_bounds(&self) -> Result<ZoomDivisorBounds, ConfigError> {
        let options = &self.options;
        ZoomDivisorBounds::new(options.maximum_zoom_divisor, options.minimum_zoom_divisor).map_err(
            |e| ConfigError::Invalid {
                field: "options.minimum_zoom_divisor",
                reason: e.to_string(),
            },
        )
    }

    /// The user's value for every overridable option.
    pub fn user_values(&self) -> [(OptionId, OverrideValue); 7] {
        let o = &self.options;
        [
            (OptionId::ZoomScrolling, OverrideValue::Bool(o.zoom_scrolling)),
            (OptionId::ExtraKeyBinds, OverrideValue::Bool(o.extra_key_binds)),
            (
                OptionId::CinematicCamera,
                OverrideValue::CinematicCamera(o.cinematic_camera),
            ),
            (OptionId::ReduceSensitivity, OverrideValue::Bool(o.reduce_sensitivity)),
            (OptionId::ZoomDivisor, OverrideValue::Double(o.zoom_divisor)),
            (
                OptionId::SpyglassDependency,
                OverrideValue::SpyglassDependency(o.spyglass_dependency),
            ),
            (OptionId::ZoomOverlay, OverrideValue::ZoomOverlay(o.zoom_overlay)),
        ]
    }

    /// Checks every derived setting at once.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection_config()?;
        self.user_divisor_bounds()?;
        let divisor = self.options.zoom_divisor;
        if divisor.is_nan() || divisor <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "options.zoom_divisor",
                reason: format!("{} is not positive", self.options.zoom_divisor),
            });
        }
        Ok(())
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if `$ZOOMER_CONFIG` is unset
/// and the platform base directory cannot be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    platform_config_dir()
        .map(|dir| dir.join("client.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from its default location.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `ClientConfig` from `path`, returning the defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to its default location.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &ClientConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Writes `config` to `path` as pretty TOML, creating the directory first.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &ClientConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `zoomer` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("zoomer"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("zoomer"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("zoomer")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
