use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;

/// Logs statistics under a name prefix, such as `Connected_number_3` for the fourth propagator of
/// a state. Nested statistics extend the prefix with [`StatisticLogger::attach_to_prefix`].
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    /// Joins the parts with underscores.
    pub fn new<Part: Display>(parts: impl IntoIterator<Item = Part>) -> Self {
        Self {
            name_prefix: parts.into_iter().join("_"),
        }
    }

    pub fn attach_to_prefix(&self, part: impl Display) -> Self {
        if self.name_prefix.is_empty() {
            Self::new([part])
        } else {
            Self::new([&self.name_prefix as &dyn Display, &part])
        }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }
}
