//! Module lookup from benchmark flag files

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

fn module_file_flag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Literal pattern; cannot fail.
        Regex::new(r"^--module_file=(.+)").expect("valid module_file regex")
    })
}

/// Find the statistics-instrumented module referenced by a flag file
///
/// The first `--module_file=<path>` line names the benchmarked module. Plain
/// modules carry no size instrumentation, so the returned path has `suffix`
/// inserted before the extension. The path is returned as written, usually
/// relative to the case directory.
///
/// Returns `None` when no such line exists.
///
/// # Examples
///
/// ```
/// use compile_stats::stats::locate_stats_module;
/// use std::path::PathBuf;
///
/// let flags = "--function_input=1x224x224x3xf32\n--module_file=foo/bar.vmfb\n";
/// assert_eq!(
///     locate_stats_module(flags, "compile-stats"),
///     Some(PathBuf::from("foo/bar-compile-stats.vmfb"))
/// );
/// ```
pub fn locate_stats_module(flagfile: &str, suffix: &str) -> Option<PathBuf> {
    let module_path = flagfile.lines().find_map(|line| {
        module_file_flag()
            .captures(line.trim())
            .and_then(|caps| caps.get(1))
            .map(|value| PathBuf::from(value.as_str()))
    })?;

    let stem = module_path.file_stem()?.to_str()?;
    let file_name = match module_path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext),
        None => format!("{}-{}", stem, suffix),
    };
    Some(module_path.with_file_name(file_name))
}
