use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, for example
/// `"vellum_engine::canvas=trace,info"`. When it is `None`, `RUST_LOG` is
/// consulted, then `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness capture instead of stderr.
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

impl LoggingConfig {
    /// Configuration for unit tests: captured output, `debug` by default.
    pub fn for_tests() -> Self {
        Self {
            default_level: LevelFilter::Debug,
            is_test: true,
            ..Self::default()
        }
    }

    fn filter(&self) -> Option<String> {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .filter(|f| !f.trim().is_empty())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger on first call; later calls are ignored.
///
/// Another logger installed by the host process is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter() {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
            }
        }

        builder
            .write_style(config.write_style)
            .is_test(config.is_test)
            .format_target(true);

        if builder.try_init().is_err() {
            log::debug!("a logger was already installed; keeping it");
            return;
        }
        log::debug!("logging initialized");
    });
}
