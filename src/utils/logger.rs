use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber for CLI runs.
///
/// `RUST_LOG` takes precedence when set; otherwise `verbose` switches the
/// crate between debug and info level.
pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose {
        "blendcraft=debug,info"
    } else {
        "blendcraft=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .without_time()
                .compact(),
        )
        .init();
}
