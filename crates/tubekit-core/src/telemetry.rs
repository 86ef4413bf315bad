//! Basic tracing setup for host applications embedding the library.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize a plain `tracing` subscriber with env-filter support.
///
/// Falls back to a sensible default filter when `RUST_LOG` is unset. Call once
/// from the host application's startup path.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tubekit=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::debug!("Tracing initialized");
    Ok(())
}
