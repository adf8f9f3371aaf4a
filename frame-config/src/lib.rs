use envconfig::Envconfig;
use lazy_static::lazy_static;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Envconfig)]
pub struct Config {
    #[envconfig(from = "FRAME_LOG_LEVEL", default = "info")]
    pub log_level: String,
    /// Upper bound on rows per Arrow record batch written by the codec. `0` writes one batch.
    #[envconfig(from = "FRAME_IPC_MAX_BATCH_ROWS", default = "0")]
    pub ipc_max_batch_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ipc_max_batch_rows: 0,
        }
    }
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// Malformed variables are logged and the defaults are used instead.
    pub fn init() -> Config {
        Self::or_default(Config::init_from_env())
    }

    fn or_default(loaded: Result<Config, envconfig::Error>) -> Config {
        loaded.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid configuration, falling back to defaults");
            Config::default()
        })
    }

    /// The configured batch bound, with `0` mapped to "unbounded".
    pub fn max_batch_rows(&self) -> Option<usize> {
        match self.ipc_max_batch_rows {
            0 => None,
            rows => Some(rows),
        }
    }
}

lazy_static! {
    pub static ref CONFIG: Config = Config::init();
}

/// Installs a global `tracing` subscriber for host processes.
///
/// `RUST_LOG` wins when set; otherwise the filter falls back to `FRAME_LOG_LEVEL`.
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(CONFIG.log_level.to_lowercase())),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
