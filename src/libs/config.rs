//! Configuration management for BTech Buddy.
//!
//! Settings are stored as pretty-printed JSON (`config.json`) in the
//! platform data directory. A missing file means "all defaults", so the
//! server runs without any setup. `buddy init` walks through a guided wizard.
//!
//! ## Sections
//!
//! - **Server**: listen address and port
//! - **Session**: cookie name and session lifetime
//! - **Attendance**: default attendance target for new subjects
//!
//! ## Environment Overrides
//!
//! Variables win over the file, and `.env` files are honoured:
//! `BUDDY_HOST`, `BUDDY_PORT`, `BUDDY_DB_PATH`, `BUDDY_SESSION_TTL_HOURS`.
//! The session-signing secret (`BUDDY_SECRET_KEY`) is never written to this
//! file; see [`crate::libs::secret`].
//!
//! ```rust,no_run
//! use btech_buddy::libs::config::Config;
//!
//! let config = Config::read()?.with_env_overrides();
//! println!("listening on {}", config.server_config().address());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// A section offered by the interactive setup.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// HTTP listener settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Database file; defaults to `buddy.db` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

/// Upper bound on `session.ttl_hours`.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Login session settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// How long a login stays valid, in hours.
    pub ttl_hours: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttendanceConfig {
    /// Target percentage pre-filled for new subjects.
    pub default_target: f64,
}

/// Root configuration object. Every section is optional and falls back to
/// its defaults when absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            db_path: None,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cookie_name: "buddy_session".to_string(),
            ttl_hours: 24 * 7,
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        AttendanceConfig { default_target: 75.0 }
    }
}

impl Config {
    /// Reads the configuration from the default data directory.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    /// Reads the configuration from a specific data directory, returning the
    /// defaults when no file exists yet.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(&config_file_path)?;
        let config: Config =
            serde_json::from_str(&config_str).with_context(|| Message::ConfigParseError(config_file_path.display().to_string()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file, if any.
    pub fn delete_from(storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Applies `BUDDY_*` environment variables on top of the file contents.
    pub fn with_env_overrides(mut self) -> Self {
        let mut server = self.server_config();
        if let Ok(host) = env::var("BUDDY_HOST") {
            server.host = host;
        }
        if let Some(port) = env::var("BUDDY_PORT").ok().and_then(|p| p.parse().ok()) {
            server.port = port;
        }
        if let Ok(path) = env::var("BUDDY_DB_PATH") {
            server.db_path = Some(PathBuf::from(path));
        }
        self.server = Some(server);

        if let Some(ttl) = env::var("BUDDY_SESSION_TTL_HOURS").ok().and_then(|t| t.parse().ok()) {
            let mut session = self.session_config();
            session.ttl_hours = ttl;
            self.session = Some(session);
        }
        self
    }

    pub fn server_config(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// The session section, with `ttl_hours` held to 1 hour .. 1 year.
    pub fn session_config(&self) -> SessionConfig {
        let mut session = self.session.clone().unwrap_or_default();
        session.ttl_hours = session.ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        session
    }

    pub fn attendance_config(&self) -> AttendanceConfig {
        self.attendance.clone().unwrap_or_default()
    }

    /// Resolves the database file path: explicit setting, else the data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        match self.server_config().db_path {
            Some(path) => Ok(path),
            None => DataStorage::new().get_path(crate::db::db::DB_FILE_NAME),
        }
    }

    /// Runs the interactive configuration wizard, starting from the current file.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "server".to_string(),
                name: "Server".to_string(),
            },
            ConfigModule {
                key: "session".to_string(),
                name: "Session".to_string(),
            },
            ConfigModule {
                key: "attendance".to_string(),
                name: "Attendance".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "server" => {
                    let default = config.server_config();
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        host: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerHost.to_string())
                            .default(default.host)
                            .interact_text()?,
                        port: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerPort.to_string())
                            .default(default.port)
                            .interact_text()?,
                        db_path: default.db_path,
                    });
                }
                "session" => {
                    let default = config.session_config();
                    msg_print!(Message::ConfigModuleSession);
                    config.session = Some(SessionConfig {
                        cookie_name: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCookieName.to_string())
                            .default(default.cookie_name)
                            .interact_text()?,
                        ttl_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSessionTtl.to_string())
                            .default(default.ttl_hours)
                            .interact_text()?,
                    });
                }
                "attendance" => {
                    let default = config.attendance_config();
                    msg_print!(Message::ConfigModuleAttendance);
                    config.attendance = Some(AttendanceConfig {
                        default_target: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDefaultTarget.to_string())
                            .default(default.default_target)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
