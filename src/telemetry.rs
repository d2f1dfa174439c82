use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or debug
/// events from this crate when `verbose` is on. Events go to stderr so they
/// never interleave with prompts on stdout.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "rental_ledger=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
