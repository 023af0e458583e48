use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "warn";

/// Installs the global tracing subscriber for the CLI.
///
/// Logs go to stderr so they never mix with dialog results on stdout.
/// `filter` takes `EnvFilter` directives; invalid directives fall back to "warn".
pub fn init_logging(filter: Option<&str>, json: bool) {
    INIT.call_once(|| {
        let filter = build_filter(filter);
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false);

        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
