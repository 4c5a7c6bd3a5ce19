//! Module path to build target resolution
//!
//! The build log names targets relative to the build directory while benchmark
//! cases point at modules by absolute path. Both are reduced to the last four
//! path segments, `<suite-dir>/<category>/<module-dir>/<file>.<ext>`, which is
//! the identifier used to correlate them.

use crate::config::LayoutConfig;
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

/// Number of trailing path segments that make up a target identifier
const TARGET_SEGMENTS: usize = 4;

/// Canonical identifier of a module build target
///
/// Always joined with `/`, independent of the host path separator. This is a
/// build-system name, not a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps module paths to build target identifiers
#[derive(Debug, Clone)]
pub struct TargetResolver {
    suite_dir: String,
    module_dir: String,
    module_extension: String,
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl TargetResolver {
    /// Create a resolver for the given build layout
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            suite_dir: layout.benchmark_suite_dir.clone(),
            module_dir: layout.module_dir.clone(),
            module_extension: layout.module_extension.clone(),
        }
    }

    /// Resolve a module path to its target identifier
    ///
    /// Only the last four segments are inspected. Returns `None` unless they
    /// are exactly `<suite-dir>/<any>/<module-dir>/<name>.<ext>`; callers decide
    /// whether a miss is fatal.
    ///
    /// # Examples
    ///
    /// ```
    /// use compile_stats::stats::TargetResolver;
    /// use std::path::Path;
    ///
    /// let resolver = TargetResolver::default();
    ///
    /// let target = resolver
    ///     .resolve(Path::new("/out/benchmark_suites/TFLite/vmfb/model.vmfb"))
    ///     .unwrap();
    /// assert_eq!(target.as_str(), "benchmark_suites/TFLite/vmfb/model.vmfb");
    ///
    /// assert!(resolver.resolve(Path::new("benchmark_suites/TFLite/model.vmfb")).is_none());
    /// ```
    pub fn resolve(&self, path: &Path) -> Option<TargetId> {
        let components: Vec<&OsStr> = path.components().map(|c| c.as_os_str()).collect();
        if components.len() < TARGET_SEGMENTS {
            return None;
        }

        let segments = components[components.len() - TARGET_SEGMENTS..]
            .iter()
            .map(|segment| segment.to_str())
            .collect::<Option<Vec<&str>>>()?;

        if segments[0] != self.suite_dir {
            return None;
        }
        if segments[2] != self.module_dir {
            return None;
        }
        let extension = Path::new(segments[3]).extension().and_then(OsStr::to_str);
        if extension != Some(self.module_extension.as_str()) {
            return None;
        }

        Some(TargetId(segments.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> Option<String> {
        TargetResolver::default()
            .resolve(Path::new(path))
            .map(|target| target.to_string())
    }

    #[test]
    fn test_resolve_exact_shape_returns_same_identifier() {
        assert_eq!(
            resolve("benchmark_suites/CategoryX/vmfb/model.vmfb").as_deref(),
            Some("benchmark_suites/CategoryX/vmfb/model.vmfb")
        );
    }

    #[test]
    fn test_resolve_uses_last_four_segments_only() {
        assert_eq!(
            resolve("/home/ci/build/benchmark_suites/TFLite/vmfb/a-compile-stats.vmfb")
                .as_deref(),
            Some("benchmark_suites/TFLite/vmfb/a-compile-stats.vmfb")
        );
    }

    #[test]
    fn test_resolve_too_few_segments_returns_none() {
        assert_eq!(resolve("vmfb/model.vmfb"), None);
        assert_eq!(resolve("TFLite/vmfb/model.vmfb"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_resolve_root_counts_as_segment() {
        // "/" takes the first slot, so the suite marker check fails.
        assert_eq!(resolve("/TFLite/vmfb/model.vmfb"), None);
    }

    #[test]
    fn test_resolve_wrong_suite_dir_returns_none() {
        assert_eq!(resolve("e2e_tests/TFLite/vmfb/model.vmfb"), None);
    }

    #[test]
    fn test_resolve_wrong_module_dir_returns_none() {
        assert_eq!(resolve("benchmark_suites/TFLite/models/model.vmfb"), None);
    }

    #[test]
    fn test_resolve_wrong_extension_returns_none() {
        assert_eq!(resolve("benchmark_suites/TFLite/vmfb/model.tflite"), None);
        assert_eq!(resolve("benchmark_suites/TFLite/vmfb/model"), None);
        assert_eq!(resolve("benchmark_suites/TFLite/vmfb/.vmfb"), None);
        assert_eq!(resolve("benchmark_suites/TFLite/vmfb/model.vmfb.stamp"), None);
    }

    #[test]
    fn test_resolve_ignores_current_dir_components() {
        assert_eq!(
            resolve("./benchmark_suites/./TFLite/vmfb/model.vmfb").as_deref(),
            Some("benchmark_suites/TFLite/vmfb/model.vmfb")
        );
    }

    #[test]
    fn test_resolve_honors_custom_layout() {
        let layout = LayoutConfig {
            benchmark_suite_dir: "suites".to_string(),
            module_dir: "modules".to_string(),
            module_extension: "bin".to_string(),
            ..LayoutConfig::default()
        };
        let resolver = TargetResolver::new(&layout);

        assert!(resolver
            .resolve(Path::new("suites/TFLite/modules/m.bin"))
            .is_some());
        assert!(resolver
            .resolve(Path::new("benchmark_suites/TFLite/vmfb/m.vmfb"))
            .is_none());
    }

    use proptest::prelude::*;

    proptest! {
        /// Property: any prefix in front of a well-formed tail resolves to that tail
        #[test]
        fn prop_prefix_does_not_change_identifier(
            prefix in proptest::collection::vec("[a-z0-9_]{1,8}", 0..5),
            category in "[A-Za-z0-9]{1,12}",
            stem in "[a-z0-9_-]{1,16}",
        ) {
            let tail = format!("benchmark_suites/{}/vmfb/{}.vmfb", category, stem);
            let mut full = prefix.join("/");
            if !full.is_empty() {
                full.push('/');
            }
            full.push_str(&tail);

            prop_assert_eq!(resolve(&full), Some(tail));
        }

        /// Property: paths with fewer than four segments never resolve
        #[test]
        fn prop_short_paths_never_resolve(
            segments in proptest::collection::vec("[a-z_.]{1,10}", 0..4),
        ) {
            let path = segments.join("/");
            prop_assert_eq!(resolve(&path), None);
        }
    }
}
