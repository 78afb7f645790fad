use crate::{errors::Error, Result};

/// Initialize logging/tracing for the bot.
///
/// Can be overridden with `RUST_LOG`.
pub fn init(service_name: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    // Default: info for our crates, warn for everything else.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(true)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to install log subscriber: {e}")))?;

    Ok(())
}

fn default_directives(service_name: &str) -> String {
    let service = service_name.replace('-', "_");
    format!("warn,hwbot_core=info,hwbot_practicum=info,hwbot_telegram=info,{service}=info")
}
