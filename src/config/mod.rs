//! Configuration management module.
//!
//! This module handles loading and saving the application configuration:
//! where the task file lives, the theme, the UI tick rate and the settings
//! of the text-assist service.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/notepad-tui";
const DARK_THEME: &str = "dark";
const LIGHT_THEME: &str = "light";

/// Settings of the chat-completions endpoint used by the assistant.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistSettings {
    /// Base URL of an OpenAI-compatible API, e.g. `http://localhost:11434/v1`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistSettings {
    fn default() -> Self {
        AssistSettings {
            url: None,
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub tasks_file: PathBuf,
    pub theme_name: String,
    pub tick_rate_ms: u64,
    pub assist: AssistSettings,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub assist: AssistSettings,
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("Tasks.txt")
}

fn default_theme_name() -> String {
    LIGHT_THEME.to_string()
}

fn default_tick_rate_ms() -> u64 {
    16
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding default settings.
    ///
    pub fn new() -> Config {
        Config {
            tasks_file: default_tasks_file(),
            theme_name: default_theme_name(),
            tick_rate_ms: default_tick_rate_ms(),
            assist: AssistSettings::default(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place; it
    /// is written on the next save.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.tasks_file = data.tasks_file;
            self.theme_name = data.theme_name;
            self.tick_rate_ms = data.tick_rate_ms;
            self.assist = data.assist;
        }

        // Relative task files live next to the configuration file
        if self.tasks_file.is_relative() {
            self.tasks_file = dir_path.join(&self.tasks_file);
        }
        self.validate()?;
        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let tasks_file = match (file_path.parent(), self.tasks_file.parent()) {
            (Some(dir), Some(parent)) if dir == parent => self
                .tasks_file
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| self.tasks_file.clone()),
            _ => self.tasks_file.clone(),
        };
        let data = FileSpec {
            tasks_file,
            theme_name: self.theme_name.clone(),
            tick_rate_ms: self.tick_rate_ms,
            assist: self.assist.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Whether the dark theme is selected.
    ///
    pub fn dark_mode(&self) -> bool {
        self.theme_name == DARK_THEME
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.theme_name = if dark { DARK_THEME } else { LIGHT_THEME }.to_string();
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_rate_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.theme_name != DARK_THEME && self.theme_name != LIGHT_THEME {
            return Err(ConfigError::InvalidValue {
                key: "theme_name".to_string(),
                message: format!("expected '{}' or '{}'", LIGHT_THEME, DARK_THEME),
            });
        }
        Ok(())
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
