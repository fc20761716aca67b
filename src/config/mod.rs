use anyhow::{Context, Result};
use serde::Deserialize;

/// Complete vufeed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VuFeedConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Level file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Level file path prefix; unit files live at `<prefix>.<unit>.vu`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_file_prefix() -> String {
    "/dev/shm/melted_preview".to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
        }
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    5555
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for VuFeedConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl VuFeedConfig {
    /// Apply positional CLI overrides: `vufeed [file-prefix] [port]`
    pub fn apply_args<I>(mut self, mut args: I) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        if let Some(prefix) = args.next() {
            self.audio.file_prefix = prefix;
        }
        if let Some(port) = args.next() {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid port argument: {port}"))?;
        }
        Ok(self)
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<VuFeedConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path}"))?;
    let config: VuFeedConfig = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}
