use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use color_eyre::{eyre::eyre, Result};

use crate::{
    app::App,
    config::{pathconfig::PathConfig, Config},
    sortclient::HttpSortClient,
};

mod action;
mod app;
mod cli;
mod components;
mod config;
mod errors;
mod headless;
mod logging;
mod notification;
mod overlay;
mod page;
mod sortclient;
mod trigger;
mod tui;

#[tokio::main]
async fn main() -> Result<()> {
    crate::errors::init()?;
    crate::logging::init()?;

    let args = Cli::parse();
    if let Some(msg) = args.is_valid() {
        return Err(eyre!(msg));
    }

    let config = Config::new(PathConfig::new(args.config, args.no_config))?
        .with_overrides(args.server, args.playlists);

    match args.command {
        Some(Command::Sort { ids }) => headless::run(config, ids).await,
        None => {
            let backend = Arc::new(HttpSortClient::new(&config.server)?);
            let mut app = App::new(config, backend, args.tick_rate, args.frame_rate);
            app.run().await
        }
    }
}
