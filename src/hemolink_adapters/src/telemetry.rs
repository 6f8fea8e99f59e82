use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppMode;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// mode's default level.
///
/// Calling it again once a subscriber is installed is an error.
pub fn init_tracing(mode: AppMode) -> Result<()> {
    let default_level = if mode.is_development() { "debug" } else { "info" };
    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let registry = tracing_subscriber::registry()
        .with(filter_layer)
        .with(ErrorLayer::default());

    if mode.is_development() {
        registry.with(fmt::layer().pretty()).try_init()?;
    } else {
        registry.with(fmt::layer().compact()).try_init()?;
    }

    Ok(())
}
