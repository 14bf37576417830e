pub mod keybindings;
pub mod messageconfig;
pub mod pageconfig;
pub mod pathconfig;
pub mod serverconfig;

use color_eyre::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{
    keybindings::KeyBindings, messageconfig::MessageConfig,
    pageconfig::{PageConfig, PlaylistEntry},
    pathconfig::PathConfig,
    serverconfig::ServerConfig,
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub messages: MessageConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
}

impl Config {
    /// Loads the built-in config, then layers every config file found in the config directory on
    /// top of it. Tables are merged, so a user file only needs the keys it changes.
    pub fn new(paths: PathConfig) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        if let Some(config_dir) = &paths.config {
            let config_files = [
                ("config.json5", config::FileFormat::Json5),
                ("config.json", config::FileFormat::Json),
                ("config.yaml", config::FileFormat::Yaml),
                ("config.toml", config::FileFormat::Toml),
                ("config.ini", config::FileFormat::Ini),
            ];
            let mut found_config = false;
            for (file, format) in &config_files {
                let path = config_dir.join(file);
                if path.exists() {
                    found_config = true;
                    info!("Loading config from {:?}", path);
                }
                builder = builder.add_source(config::File::from(path).format(*format).required(false));
            }
            if !found_config {
                warn!(
                    "No configuration file found in {:?}, using built-in defaults",
                    config_dir
                );
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Applies command line overrides on top of the loaded config
    pub fn with_overrides(mut self, server: Option<String>, playlists: Vec<PlaylistEntry>) -> Self {
        if let Some(url) = server {
            self.server.url = url;
        }
        self.page.playlists.extend(playlists);
        self
    }
}
