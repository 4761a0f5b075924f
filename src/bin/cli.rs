// src/bin/cli.rs
use api_downloader::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    log::init();
    cli::run()
}
