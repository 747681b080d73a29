//! Where statistics are written. Nothing is written until [`configure_statistic_logging`] has
//! been called; a later call replaces the earlier configuration.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;

use convert_case::Case;
use convert_case::Casing;

/// How statistics are formatted. Every statistic is written on its own line as
/// `{prefix} {name}={value}`.
///
/// ```
/// # use ripple_core::statistics::StatisticOptions;
/// # use ripple_core::convert_case::Case;
/// let options = StatisticOptions::default()
///     .with_prefix("%%%mzn-stat:")
///     .with_closing_line("%%%mzn-stat-end")
///     .with_casing(Case::Camel);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticOptions {
    prefix: String,
    closing_line: Option<String>,
    casing: Option<Case>,
}

impl Default for StatisticOptions {
    fn default() -> Self {
        StatisticOptions {
            prefix: "%%".to_owned(),
            closing_line: None,
            casing: None,
        }
    }
}

impl StatisticOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// A line written by [`log_statistic_postfix`] after a block of statistics.
    pub fn with_closing_line(mut self, closing_line: impl Into<String>) -> Self {
        self.closing_line = Some(closing_line.into());
        self
    }

    /// Converts the statistic names, which are snake case, before writing them.
    pub fn with_casing(mut self, casing: Case) -> Self {
        self.casing = Some(casing);
        self
    }

    fn format_name(&self, name: impl Display) -> String {
        match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        }
    }
}

struct StatisticSink {
    options: StatisticOptions,
    writer: Box<dyn Write + Send>,
}

impl Debug for StatisticSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticSink")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

static STATISTIC_SINK: Mutex<Option<StatisticSink>> = Mutex::new(None);

fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    if let Ok(mut sink) = STATISTIC_SINK.lock() {
        if let Some(sink) = sink.as_mut() {
            action(sink);
        }
    }
}

/// Starts writing statistics to `writer`, or to stdout when no writer is given.
pub fn configure_statistic_logging(options: StatisticOptions, writer: Option<Box<dyn Write + Send>>) {
    if let Ok(mut sink) = STATISTIC_SINK.lock() {
        *sink = Some(StatisticSink {
            options,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        });
    }
}

/// Writes a single statistic, if statistic logging is configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| {
        let name = sink.options.format_name(name);
        let _ = writeln!(sink.writer, "{} {name}={value}", sink.options.prefix);
    });
}

/// Writes the closing line, if one is configured.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(closing_line) = &sink.options.closing_line {
            let _ = writeln!(sink.writer, "{closing_line}");
        }
    });
}

pub fn should_log_statistics() -> bool {
    STATISTIC_SINK
        .lock()
        .map(|sink| sink.is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use convert_case::Case;

    use super::configure_statistic_logging;
    use super::log_statistic;
    use super::log_statistic_postfix;
    use super::should_log_statistics;
    use super::StatisticOptions;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn statistics_are_written_with_prefix_and_casing() {
        let buffer = SharedBuffer::default();
        configure_statistic_logging(
            StatisticOptions::default()
                .with_prefix("stat:")
                .with_closing_line("end")
                .with_casing(Case::Camel),
            Some(Box::new(buffer.clone())),
        );
        assert!(should_log_statistics());

        log_statistic("engine_num_moves", 12);
        log_statistic_postfix();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(written.contains("stat: engineNumMoves=12\n"));
        assert!(written.contains("\nend\n"));
    }
}
