use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parsing(#[from] toml::de::Error),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub content: ContentConfig,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Scroll".into(),
            tagline: Some("Line by line readings with commentary".to_string()),
        }
    }
}

/// Where content lives inside the source directory.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding `<book>/<chapter>/*.txt`, relative to the source.
    pub library: String,
    /// Directories copied verbatim into the output.
    pub passthrough: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            library: "library".to_string(),
            passthrough: vec!["css".to_string(), "img".to_string()],
        }
    }
}
