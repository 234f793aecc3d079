//! Log output for the `addrgen` binary.
//!
//! Events go to stderr so stdout carries nothing but addresses. The level is
//! taken from `RUST_LOG` (default `warn`) unless `--debug` is passed.
//!
//! ```bash
//! RUST_LOG=addrgen=trace addrgen --seed MYSEED --count 3
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
