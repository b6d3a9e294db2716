//! Logger initialisation for the qshield binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialises `env_logger` once.
///
/// With `level` set, that level applies to every module; otherwise
/// `RUST_LOG` decides, defaulting to `warn`. Calling it again is a no-op.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}
