//! Build log parsing
//!
//! Reads a ninja v5 `.ninja_log` and records how long each module target took
//! to build. Rows look like:
//!
//! ```text
//! # ninja log v5
//! 1200\t2434\t1667000000\tbenchmark_suites/TFLite/vmfb/m.vmfb\t6c1f0a...
//! ```
//!
//! Start and end are milliseconds since the build started. A target rebuilt by
//! a later incremental build appears again further down; the last row wins.

use super::target::{TargetId, TargetResolver};
use crate::error::CompileStatsError;
use std::collections::HashMap;
use std::io::BufRead;

/// Fields per log row: start, end, mtime, target, command hash
const LOG_FIELDS: usize = 5;

/// Build duration per module target, in milliseconds
///
/// Built once from the whole log and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDurationIndex {
    durations: HashMap<TargetId, u64>,
}

impl BuildDurationIndex {
    /// Duration of the last recorded build of `target`
    pub fn get(&self, target: &TargetId) -> Option<u64> {
        self.durations.get(target).copied()
    }

    /// Number of module targets in the index
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Whether no module target was found in the log
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// Parses ninja build logs into a [`BuildDurationIndex`]
#[derive(Debug, Clone)]
pub struct NinjaLogParser {
    header: String,
    resolver: TargetResolver,
}

impl NinjaLogParser {
    /// Create a parser expecting `header` on the first line
    pub fn new(header: impl Into<String>, resolver: TargetResolver) -> Self {
        Self {
            header: header.into(),
            resolver,
        }
    }

    /// Parse a complete build log
    ///
    /// Rows whose target is not a benchmark module are skipped. Any other
    /// deviation from the format is an error, since it means the log producer
    /// and this parser have drifted apart.
    ///
    /// # Examples
    ///
    /// ```
    /// use compile_stats::stats::{NinjaLogParser, TargetResolver};
    /// use std::path::Path;
    ///
    /// let log = "# ninja log v5\n\
    ///            0\t40\t0\tobj/runtime.o\tabc\n\
    ///            10\t1244\t0\tbenchmark_suites/TFLite/vmfb/m.vmfb\tdef\n";
    ///
    /// let parser = NinjaLogParser::new("ninja log v5", TargetResolver::default());
    /// let index = parser.parse(log.as_bytes()).unwrap();
    ///
    /// let target = TargetResolver::default()
    ///     .resolve(Path::new("benchmark_suites/TFLite/vmfb/m.vmfb"))
    ///     .unwrap();
    /// assert_eq!(index.get(&target), Some(1234));
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn parse<R: BufRead>(&self, log: R) -> Result<BuildDurationIndex, CompileStatsError> {
        let mut lines = log.lines();

        let header = match lines.next() {
            Some(line) => line.map_err(|e| CompileStatsError::io("reading build log", e))?,
            None => String::new(),
        };
        if !header.contains(&self.header) {
            return Err(CompileStatsError::UnsupportedLogFormat { header });
        }

        let mut durations = HashMap::new();
        let mut skipped = 0usize;
        for (index, line) in lines.enumerate() {
            // Header is line 1.
            let line_number = index + 2;
            let line = line.map_err(|e| CompileStatsError::io("reading build log", e))?;

            let row = parse_row(line.trim(), line_number)?;
            let Some(target) = self.resolver.resolve(std::path::Path::new(row.target)) else {
                skipped += 1;
                continue;
            };

            log::trace!("{} built in {} ms", target, row.duration_ms);
            durations.insert(target, row.duration_ms);
        }

        log::debug!(
            "Build log: {} module targets, {} other rows skipped",
            durations.len(),
            skipped
        );
        Ok(BuildDurationIndex { durations })
    }
}

impl Default for NinjaLogParser {
    fn default() -> Self {
        Self::new("ninja log v5", TargetResolver::default())
    }
}

struct LogRow<'a> {
    target: &'a str,
    duration_ms: u64,
}

fn parse_row(line: &str, line_number: usize) -> Result<LogRow<'_>, CompileStatsError> {
    let malformed = |reason: String| CompileStatsError::MalformedLogRow {
        line_number,
        line: line.to_string(),
        reason,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != LOG_FIELDS {
        return Err(malformed(format!(
            "expected {} tab-separated fields, found {}",
            LOG_FIELDS,
            fields.len()
        )));
    }

    let start: u64 = fields[0]
        .parse()
        .map_err(|_| malformed(format!("invalid start time '{}'", fields[0])))?;
    let end: u64 = fields[1]
        .parse()
        .map_err(|_| malformed(format!("invalid end time '{}'", fields[1])))?;
    let duration_ms = end.checked_sub(start).ok_or_else(|| {
        malformed(format!("end time {} is before start time {}", end, start))
    })?;

    Ok(LogRow {
        target: fields[3],
        duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn target(path: &str) -> TargetId {
        TargetResolver::default()
            .resolve(Path::new(path))
            .expect("test path should resolve")
    }

    fn parse(log: &str) -> Result<BuildDurationIndex, CompileStatsError> {
        NinjaLogParser::default().parse(log.as_bytes())
    }

    #[test]
    fn test_parse_last_row_wins_for_repeated_target() {
        let log = "# ninja log v5\n\
                   100\t600\t0\tbenchmark_suites/TFLite/vmfb/m.vmfb\taaa\n\
                   9000\t9250\t0\tbenchmark_suites/TFLite/vmfb/m.vmfb\tbbb\n";

        let index = parse(log).unwrap();
        assert_eq!(
            index.get(&target("benchmark_suites/TFLite/vmfb/m.vmfb")),
            Some(250)
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_parse_skips_non_module_targets() {
        let log = "# ninja log v5\n\
                   0\t10\t0\truntime/src/iree/vm/libvm.a\taaa\n\
                   0\t10\t0\tbenchmark_suites/TFLite/MobileNet/flagfile\tbbb\n";

        let index = parse(log).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_parse_missing_header_fails_before_rows() {
        // The second row would be malformed; the header check must fire first.
        let log = "# ninja log v4\nnot a row\n";
        let err = parse(log).unwrap_err();
        assert!(matches!(
            err,
            CompileStatsError::UnsupportedLogFormat { ref header } if header == "# ninja log v4"
        ));
    }

    #[test]
    fn test_parse_empty_log_is_unsupported() {
        assert!(matches!(
            parse(""),
            Err(CompileStatsError::UnsupportedLogFormat { .. })
        ));
    }

    #[test]
    fn test_parse_header_only_yields_empty_index() {
        let index = parse("# ninja log v5\n").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_parse_wrong_field_count_is_fatal() {
        let log = "# ninja log v5\n0\t10\tbenchmark_suites/TFLite/vmfb/m.vmfb\n";
        let err = parse(log).unwrap_err();
        match err {
            CompileStatsError::MalformedLogRow {
                line_number,
                reason,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert!(reason.contains("found 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_non_integer_time_is_fatal() {
        let log = "# ninja log v5\n0\tsoon\t0\tbenchmark_suites/TFLite/vmfb/m.vmfb\th\n";
        assert!(matches!(
            parse(log),
            Err(CompileStatsError::MalformedLogRow { .. })
        ));
    }

    #[test]
    fn test_parse_malformed_non_module_row_is_still_fatal() {
        let log = "# ninja log v5\n0\t1\t0\tobj/a.o\n";
        assert!(parse(log).is_err());
    }

    #[test]
    fn test_parse_end_before_start_is_fatal() {
        let log = "# ninja log v5\n50\t10\t0\tbenchmark_suites/TFLite/vmfb/m.vmfb\th\n";
        let err = parse(log).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_parse_accepts_crlf_line_endings() {
        let log = "# ninja log v5\r\n5\t15\t0\tbenchmark_suites/TFLite/vmfb/m.vmfb\th\r\n";
        let index = parse(log).unwrap();
        assert_eq!(
            index.get(&target("benchmark_suites/TFLite/vmfb/m.vmfb")),
            Some(10)
        );
    }

    #[test]
    fn test_parse_keeps_distinct_targets_apart() {
        let log = "# ninja log v5\n\
                   0\t100\t0\tbenchmark_suites/TFLite/vmfb/a.vmfb\th\n\
                   0\t200\t0\tbenchmark_suites/TFLite/vmfb/a-compile-stats.vmfb\th\n\
                   0\t300\t0\tbenchmark_suites/TF/vmfb/a.vmfb\th\n";

        let index = parse(log).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get(&target("benchmark_suites/TFLite/vmfb/a-compile-stats.vmfb")),
            Some(200)
        );
        assert_eq!(
            index.get(&target("benchmark_suites/TF/vmfb/a.vmfb")),
            Some(300)
        );
    }
}
