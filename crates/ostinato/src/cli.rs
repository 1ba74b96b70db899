use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

pub mod kins;
pub mod plan;

/// Per-period output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Comma separated values with a header row
    #[default]
    Csv,
    /// One JSON object per line
    Json,
}

/// Log to stderr so stdout carries only samples. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
