//! Output tunables for the stream and dump listings, loadable from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Address the accelerator maps the command buffer at; listing addresses start here.
pub const DEFAULT_STREAM_BASE: u64 = 0xffef_0000;
/// Column at which EMIT statements are aligned in the annotated stream listing.
pub const DEFAULT_EMIT_COLUMN: usize = 50;
/// Bytes per row of the hex listing.
pub const DEFAULT_BLOCK_BYTES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    pub stream_base_address: u64,
    pub emit_column: usize,
    pub block_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            stream_base_address: DEFAULT_STREAM_BASE,
            emit_column: DEFAULT_EMIT_COLUMN,
            block_bytes: DEFAULT_BLOCK_BYTES,
        }
    }
}

impl DecoderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DecoderConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_bytes == 0 || self.block_bytes % 4 != 0 {
            return Err(ConfigError::Invalid {
                key: "block_bytes",
                reason: format!("{} is not a non-zero multiple of 4", self.block_bytes),
            });
        }
        Ok(())
    }
}
