use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; enabling debug logging in
/// the settings file raises it to `debug` and lets the `RUST_LOG` environment
/// variable override the filter.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        // Force `info` so a stray RUST_LOG in the environment cannot make the
        // app verbose unless debug logging was chosen explicitly.
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
