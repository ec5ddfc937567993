use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset.
///
/// `-v` raises this crate to debug, `-vv` to trace, `-vvv` everything.
pub fn default_filter(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => format!("{configured},dirtree_sync=debug"),
        2 => format!("{configured},dirtree_sync=trace"),
        _ => "trace".to_string(),
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the computed filter.
pub fn init_logging(verbosity: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity, configured)));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(verbosity > 1)
        .with_level(true)
        .with_filter(filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
