use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the service's own crate logs at
/// debug and everything else at `log_level`. Output is JSON with file and
/// line locations, flattened for log shippers.
pub fn init_tracing(service_name: &str, log_level: &str) {
    let default_filter = format!("{},{}=debug", log_level, service_name.replace('-', "_"));
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .init();
}
