use clap::{Parser, Subcommand};

use crate::config::{pageconfig::PlaylistEntry, pathconfig::PathConfig};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 30.0)]
    pub frame_rate: f64,

    /// Specifies the *directory* of the config to load. This directory is expected to contain
    /// files like "config.json5".
    #[arg(short, long)]
    pub config: Option<String>,

    /// Do not use any config other than the preset. Incompatible with --config.
    #[arg(long, default_value_t = false)]
    pub no_config: bool,

    /// Base URL of the sorting server. Overrides `server.url` in the config.
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Adds a sort button for a playlist. Can be given multiple times.
    #[arg(short, long = "playlist", value_name = "ID[=NAME]")]
    pub playlists: Vec<PlaylistEntry>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sort the given playlists without opening the interface, and print the results
    Sort {
        /// Playlist IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Cli {
    pub fn is_valid(&self) -> Option<String> {
        if self.config.is_some() && self.no_config {
            return Some("Incompatible flags set: --config and --no-config".to_string());
        };
        if self.tick_rate <= 0.0 || self.frame_rate <= 0.0 {
            return Some("Tick rate and frame rate must be positive".to_string());
        }
        None
    }
}

const VERSION_MESSAGE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "-",
    env!("VERGEN_GIT_DESCRIBE"),
    " (",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

pub fn version() -> String {
    let author = clap::crate_authors!();

    let config_dir_path = PathConfig::get_config_dir().display().to_string();
    let data_dir_path = PathConfig::get_data_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
