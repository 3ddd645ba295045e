use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

/// Nivel por defecto según `-q` y el número de `-v`.
pub fn default_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}

/// Inicializa los logs en stderr; `WFEB_LOG` tiene prioridad sobre los flags.
pub fn init(verbose: u8, quiet: bool) {
    let default_level = default_level(verbose, quiet);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
