use std::path::PathBuf;

use clap::Parser;

/// Picto image tools gateway
#[derive(Debug, Parser)]
#[command(name = "picto", about = "Text-to-image, background removal and image uploads behind one HTTP API")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "picto.toml", env = "PICTO_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PICTO_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
