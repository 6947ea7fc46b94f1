// CLI module for http-relay

use clap::Parser;

/// http-relay - buffering HTTP forwarding proxy with response interception and caching
#[derive(Parser, Debug)]
#[command(name = "http-relay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (overrides the default lookup)
    #[arg(long)]
    pub config: Option<String>,

    /// Listen address override, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,
}
