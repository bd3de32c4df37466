use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize tracing for the process.
///
/// Default: info for our crates and everything else. Can be overridden with `RUST_LOG`.
/// Output goes to stderr; stdout is left to the interactive prompt.
pub fn init(service_name: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,tgnotify_core=info,tgnotify_telegram=info,{service_name}=info"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Config(format!("logging init failed: {e}")))
}
