use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage backend: "api" for the notes service, "dataset" for the
    /// data.world-style file store.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_theme_name")]
    pub theme: String,
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,
    /// Where the signed-in session is remembered between runs. Tilde paths
    /// are expanded.
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_api_url")]
    pub api_url: String,
    #[serde(default = "default_dataset_org")]
    pub org: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_tab_width")]
    pub tab_width: u16,
    /// How close to the bottom (in rows) the editor view has to be for the
    /// preview to stay pinned while typing.
    #[serde(default = "default_follow_threshold")]
    pub follow_threshold: usize,
}

fn default_backend() -> String {
    "api".to_string()
}

fn default_api_url() -> String {
    "https://api.markable.in".to_string()
}

fn default_theme_name() -> String {
    "markable-dark".to_string()
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_session_file() -> String {
    "~/.config/markable/session.toml".to_string()
}

fn default_dataset_api_url() -> String {
    "https://api.data.world/v0".to_string()
}

fn default_dataset_org() -> String {
    "markable-repo".to_string()
}

fn default_tab_width() -> u16 {
    4
}

fn default_follow_threshold() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: default_api_url(),
            theme: default_theme_name(),
            syntax_theme: default_syntax_theme(),
            session_file: default_session_file(),
            dataset: DatasetConfig::default(),
            editor: EditorConfig::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            api_url: default_dataset_api_url(),
            org: default_dataset_org(),
            token: String::new(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            follow_threshold: default_follow_threshold(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Self::config_path();

        if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Failed to parse config: {}", e),
                },
                Err(e) => eprintln!("Failed to read config: {}", e),
            }
        }

        Self::default()
    }

    /// Load config, creating the default config directory, theme file and
    /// config file if they don't exist. Never overwrites existing files.
    pub fn load_or_create() -> Self {
        let config_dir = Self::config_dir();
        let config_path = Self::config_path();
        let themes_dir = Self::themes_dir();

        if !config_dir.exists() {
            let _ = fs::create_dir_all(&config_dir);
        }
        if !themes_dir.exists() {
            let _ = fs::create_dir_all(&themes_dir);
        }

        let default_theme_path = themes_dir.join("markable-dark.toml");
        if !default_theme_path.exists() {
            let default_theme_content = include_str!("../themes/markable-dark.toml");
            let _ = fs::write(&default_theme_path, default_theme_content);
        }

        if !config_path.exists() {
            let default_config = Self::default();
            if let Ok(toml_string) = toml::to_string_pretty(&default_config) {
                let _ = fs::write(&config_path, toml_string);
            }
        }

        Self::load()
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        // Always use ~/.config/markable/ on macOS and Linux
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("markable")
    }

    pub fn themes_dir() -> PathBuf {
        Self::config_dir().join("themes")
    }

    pub fn session_path(&self) -> PathBuf {
        let path = shellexpand::tilde(&self.session_file).to_string();
        PathBuf::from(path)
    }
}
