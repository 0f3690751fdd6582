use env_logger::Env;

/// Installs the process-wide logger. `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}
