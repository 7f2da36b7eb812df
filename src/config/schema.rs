//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for the slicer proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Exposed API surface settings.
    pub api: ApiConfig,

    /// Slicer backend connection settings.
    pub backend: BackendConfig,

    /// Where sliced G-code files are written.
    pub output: OutputConfig,

    /// Static UI page settings.
    pub ui: UiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:7130").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7130".to_string(),
        }
    }
}

/// Settings for the REST surface exposed to the UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix every endpoint is mounted under. Empty mounts at the root.
    pub path_prefix: String,

    /// Maximum inbound body size in bytes (model uploads can be large).
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/server/orcaslicer".to_string(),
            max_body_size: 512 * 1024 * 1024,
        }
    }
}

/// Slicer backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the slicer service.
    pub base_url: String,

    /// Timeout for slice requests in seconds.
    pub request_timeout_secs: u64,

    /// Timeout for bodiless reads/deletes and profile renames in seconds.
    pub simple_timeout_secs: u64,

    /// Timeout for profile uploads and replacements in seconds.
    pub profile_timeout_secs: u64,
}

impl BackendConfig {
    /// Base URL without trailing slashes.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn simple_timeout(&self) -> Duration {
        Duration::from_secs(self.simple_timeout_secs)
    }

    pub fn profile_timeout(&self) -> Duration {
        Duration::from_secs(self.profile_timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 300,
            simple_timeout_secs: 10,
            profile_timeout_secs: 30,
        }
    }
}

/// Output directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated G-code. A leading `~` expands to `$HOME`.
    pub gcodes_path: String,
}

impl OutputConfig {
    /// The output directory with `~` expanded.
    pub fn gcodes_dir(&self) -> PathBuf {
        expand_tilde(&self.gcodes_path)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            gcodes_path: "~/printer_data/gcodes".to_string(),
        }
    }
}

/// Static UI page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// HTML file served at `/ui`. A leading `~` expands to `$HOME`.
    pub html_path: String,
}

impl UiConfig {
    pub fn html_file(&self) -> PathBuf {
        expand_tilde(&self.html_path)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            html_path: "ui/slicer_ui.html".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// Paths without a leading tilde, or a tilde when `HOME` is unset, are
/// returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };

    match std::env::var_os("HOME") {
        Some(home) if rest.is_empty() => PathBuf::from(home),
        Some(home) => Path::new(&home).join(rest),
        None => PathBuf::from(path),
    }
}
