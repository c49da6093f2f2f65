//! Where statistics are written to.
//!
//! Once [`configure_statistic_logging`] has been called, every statistic is written to the
//! configured writer as `{PREFIX} {NAME}={VALUE}`. Before that, statistics go to the [`log`]
//! facade at debug level under the `pumpkin_graph::statistics` target.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::io::stdout;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;
use log::debug;

/// The prefix, the casing of the names and the destination of logged statistics.
pub struct StatisticOptions {
    prefix: &'static str,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Configures the logging of statistics; without a writer, stdout is used.
///
/// The configuration can be set only once. Returns whether this call set it.
pub fn configure_statistic_logging(
    prefix: &'static str,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) -> bool {
    let mut configured = false;
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        configured = true;
        Mutex::new(StatisticOptions {
            prefix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
    configured
}

/// Logs the statistic `name` with the provided `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(options) = STATISTIC_OPTIONS.get() else {
        debug!(target: "pumpkin_graph::statistics", "{name}={value}");
        return;
    };

    if let Ok(mut options) = options.lock() {
        let name = match options.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let prefix = options.prefix;
        let _ = writeln!(options.writer, "{prefix} {name}={value}");
    }
}
