use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over `level`; JSON lines when asked or when stderr is not a terminal
pub fn init(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let interactive = atty::is(atty::Stream::Stderr);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json || !interactive {
        builder.json().try_init()
    } else {
        builder.with_ansi(true).try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialised: {e}");
    }
}
