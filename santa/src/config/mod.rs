//! Configuration system for the `santa` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/santa/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    screen: ScreenFileConfig,
    backend: BackendFileConfig,
}

/// `[screen]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ScreenFileConfig {
    action_backlog_warn: Option<usize>,
}

/// `[backend]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BackendFileConfig {
    latency_ms: Option<u64>,
    owner_id: Option<String>,
    username: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Settings shared by every screen controller.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Number of unobserved actions after which sends log a warning.
    pub action_backlog_warn: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            action_backlog_warn: 32,
        }
    }
}

/// Settings of the in-memory backend used by the demo CLI.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Artificial latency of every use-case call.
    pub latency: Duration,
    /// Identifier of the signed-in user.
    pub owner_id: String,
    /// Display name of the signed-in user.
    pub username: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(150),
            owner_id: "local".to_string(),
            username: "Santa".to_string(),
        }
    }
}

/// Fully resolved client configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Screen controller settings.
    pub screen: ScreenConfig,
    /// Demo backend settings.
    pub backend: BackendConfig,
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed, or the default file exists but cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            screen: ScreenConfig {
                action_backlog_warn: file
                    .screen
                    .action_backlog_warn
                    .unwrap_or(defaults.screen.action_backlog_warn),
            },
            backend: BackendConfig {
                latency: cli
                    .latency_ms
                    .or(file.backend.latency_ms)
                    .map_or(defaults.backend.latency, Duration::from_millis),
                owner_id: file
                    .backend
                    .owner_id
                    .clone()
                    .unwrap_or(defaults.backend.owner_id),
                username: cli
                    .username
                    .clone()
                    .or_else(|| file.backend.username.clone())
                    .unwrap_or(defaults.backend.username),
            },
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Secret Santa client screens, driven from the terminal")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/santa/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Latency of every backend call in milliseconds.
    #[arg(long, env = "SANTA_LATENCY_MS")]
    pub latency_ms: Option<u64>,

    /// Display name of the signed-in user.
    #[arg(long, env = "SANTA_USERNAME")]
    pub username: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "SANTA_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/santa.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Screen to drive (default: `profile`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Screens the CLI can drive.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fill in and submit the room creation form.
    CreateRoom {
        /// Room name.
        #[arg(long)]
        name: String,
        /// Join password.
        #[arg(long)]
        password: Option<String>,
        /// Gift exchange date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Gift price limit.
        #[arg(long)]
        max_price: Option<String>,
    },
    /// Open the profile screen.
    Profile {
        /// Press "edit username".
        #[arg(long)]
        edit: bool,
        /// Press "log out".
        #[arg(long)]
        logout: bool,
        /// Press "delete account".
        #[arg(long)]
        delete: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Profile {
            edit: false,
            logout: false,
            delete: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        // No config dir available, use defaults.
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("santa").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
