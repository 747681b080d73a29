use std::fmt::Display;

use super::statistic_logging::log_statistic;

/// Writes statistics under a shared name prefix, e.g. `engine_propagations`.
#[derive(Debug, Default)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new(name_prefix: impl Display) -> Self {
        Self {
            name_prefix: name_prefix.to_string(),
        }
    }

    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        let name_prefix = if self.name_prefix.is_empty() {
            addition_to_prefix.to_string()
        } else {
            format!("{}_{}", self.name_prefix, addition_to_prefix)
        };
        Self { name_prefix }
    }
}

impl std::fmt::Write for StatisticLogger {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        log_statistic(&self.name_prefix, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StatisticLogger;

    #[test]
    fn empty_prefix_is_not_joined_with_underscore() {
        let logger = StatisticLogger::default().attach_to_prefix("moves");
        assert_eq!(logger.name_prefix, "moves");

        let nested = StatisticLogger::new("search").attach_to_prefix("moves");
        assert_eq!(nested.name_prefix, "search_moves");
    }
}
