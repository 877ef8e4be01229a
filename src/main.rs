use anyhow::Result;
use clap::Parser;
use pwa_icons::icon_gen::{self, IconConfig};

/// Takes no options: sizes, color and output directory are fixed.
#[derive(Debug, Parser)]
#[clap(
    name = "pwa-icons",
    version,
    about = "Generate the PWA badge icon set into ./icons"
)]
struct Args {}

fn main() -> Result<()> {
    let _args = Args::parse();
    env_logger::init();

    icon_gen::generate_icons(&IconConfig::default())?;
    Ok(())
}
