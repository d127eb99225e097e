//! Logging utilities and structured logging support
//!
//! The engine logs through the `log` facade only. Binaries pick the sink;
//! these helpers wire up `env_logger`, which honours `RUST_LOG`.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a default filter such as `"info"` or
/// `"arbor_engine=debug"`
///
/// `RUST_LOG` still takes precedence when it is set.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, ignoring level '{}'", level);
    }
}
