//! Tracing setup for the server binaries.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` directives are honoured and
/// `level` applies to the `shopform` crates.
pub fn init(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("shopform={level}").parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
