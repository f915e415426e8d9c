use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

// Endpoint default and summary/ledger bounds live in wikibot_core
use wikibot_core::{DEFAULT_ENDPOINT, SessionLimits};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub session: SessionLimits,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    #[serde(default = "EndpointConfig::default_url")]
    pub url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl EndpointConfig {
    fn default_url() -> String {
        DEFAULT_ENDPOINT.to_string()
    }
}

/// Terminal look and feel. Read by the presentation layer only.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PresentationConfig {
    #[serde(default)]
    pub color_mode: ColorMode,
    #[serde(default = "PresentationConfig::default_show_timestamps")]
    pub show_timestamps: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            show_timestamps: Self::default_show_timestamps(),
        }
    }
}

impl PresentationConfig {
    const fn default_show_timestamps() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

const CONFIG_TEMPLATE: &str = r#"{
  "endpoint": {
    "url": "https://wikibot-backend.onrender.com/api/query"
  },
  "session": {
    "title_max_chars": 30,
    "preview_max_chars": 50,
    "ledger_capacity": 5
  },
  "presentation": {
    "color_mode": "dark",
    "show_timestamps": true
  }
}
"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("wikibot"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'wikibot init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    /// Load the config file if present, otherwise use built-in defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load()
        } else {
            info!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        Self::create_at(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point endpoint.url at your query backend if it is not the default");
        println!("   2. Run 'wikibot chat' to start a conversation");
        println!();
        println!("🔧 Configuration options:");
        println!("   - session.title_max_chars / preview_max_chars: summary lengths");
        println!("   - session.ledger_capacity: how many recent sessions to keep");
        println!("   - presentation.color_mode: dark or light");
        println!();
        Ok(())
    }

    /// Write the config template to `path`, refusing to overwrite.
    pub fn create_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        std::fs::write(path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}
