#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs, Debug)]
/// Texture transcoding tool
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Transcode(commands::transcode::TranscodeCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Transcode(cmd) => {
            commands::transcode::handle_transcode_command(cmd)?;
        }
    }

    Ok(())
}
