use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{ApplicationError, InitializeLoggerSnafu};

/// Install the global subscriber: pretty output on stdout plus a daily
/// rolling JSON file under the configured log directory.
///
/// The returned guard must stay alive for the lifetime of the process or the
/// file writer stops flushing.
pub fn init(config: &Config) -> Result<WorkerGuard, ApplicationError> {
    let file = tracing_appender::rolling::daily(&config.log_directory, "margarita-tour.log");
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
        .try_init()
        .context(InitializeLoggerSnafu)?;

    Ok(guard)
}
