use anyhow::{Context, Result};
use gitalk_graph::{CharsetProfile, TextRenderer};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Drawing options read from a TOML file; missing keys keep their defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub charset: CharsetProfile,
    pub color: bool,
    pub hash_width: usize,
    pub message_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: CharsetProfile::Utf8,
            color: false,
            hash_width: 7,
            message_width: 72,
        }
    }
}

impl RenderConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// `--config` first, then `GITALK_CONFIG`, then defaults
    pub fn resolve(cli_config: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = cli_config {
            Self::load_from_file(path)
        } else if let Ok(path) = std::env::var("GITALK_CONFIG") {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn renderer(&self) -> TextRenderer {
        TextRenderer::new(self.charset)
            .with_color(self.color)
            .with_hash_width(self.hash_width)
            .with_message_width(self.message_width)
    }
}
