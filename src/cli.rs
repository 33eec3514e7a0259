// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "spacetouch")]
#[command(about = "Parallax touch demo on overlay planes", long_about = None)]
pub struct Cli {
    /// Screen configuration declaring the overlay planes
    #[arg(long, default_value = "spacetouch.screen")]
    pub screen: PathBuf,

    /// Directory holding plane0..3.png and logo.png
    #[arg(long, default_value = "media")]
    pub media: PathBuf,

    /// Composite planes in software instead of on the GPU
    #[arg(long, default_value = "false")]
    pub software: bool,

    /// Exit instead of falling back when hardware planes cannot be set up
    #[arg(long = "require-planes", default_value = "false", conflicts_with = "software")]
    pub require_planes: bool,

    /// Number of planes the hardware device exposes
    #[arg(long = "hw-planes", default_value_t = 4)]
    pub hw_planes: usize,

    /// Kernel CPU statistics file
    #[arg(long, default_value = "/proc/stat")]
    pub stat: PathBuf,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// CPU gauge refresh period in milliseconds
    #[arg(long = "sample-interval-ms", default_value_t = 1000)]
    pub sample_interval_ms: u64,
}

impl Cli {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}
