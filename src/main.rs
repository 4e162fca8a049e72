#![doc = include_str!("../README.md")]

mod cmd;

use {
    crate::cmd::MainCmd,
    anyhow::{Context, Result},
    tracing_subscriber::EnvFilter,
};

fn main() -> Result<()> {
    let cmd: MainCmd = argh::from_env();

    // `RUST_LOG` takes precedence, `--verbose` only changes the fallback level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cmd.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    cmd.run()
        .with_context(|| format!("failed to update formula {:?}", cmd.formula))
}
