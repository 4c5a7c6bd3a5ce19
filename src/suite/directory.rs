//! Benchmark suite loaded from a build directory
//!
//! Expected layout below the suite root:
//!
//! ```text
//! benchmark_suites/
//!   <category>/                          e.g. TFLite
//!     vmfb/                              compiled modules, not a model
//!     <model>[-<tag>,<tag>]/             e.g. MobileNetV2-fp32,imagenet
//!       <driver>__<arch>__<mode>,<mode>/ one benchmark case
//!         flagfile
//!         run_config.json                optional structured config
//! ```

use super::{BenchmarkCase, BenchmarkMode, BenchmarkSuite, CaseFilter, RunConfig};
use crate::config::LayoutConfig;
use crate::error::CompileStatsError;
use crate::infra::{FileSystem, RealFileSystem};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Run config file name inside a case directory
pub const RUN_CONFIG_FILE: &str = "run_config.json";

/// Separator between the driver, architecture and mode parts of a case directory name
const CASE_NAME_SEPARATOR: &str = "__";

#[derive(Debug)]
struct Category {
    dir: PathBuf,
    cases: Vec<BenchmarkCase>,
}

/// Benchmark suite discovered on disk
#[derive(Debug)]
pub struct SuiteDirectory {
    categories: BTreeMap<String, Category>,
}

impl SuiteDirectory {
    /// Load every benchmark case under `root`
    pub fn load(root: &Path, layout: &LayoutConfig) -> Result<Self, CompileStatsError> {
        Self::load_with_fs(root, layout, &RealFileSystem)
    }

    /// Load with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(
        root: &Path,
        layout: &LayoutConfig,
        fs: &FS,
    ) -> Result<Self, CompileStatsError> {
        let mut categories = BTreeMap::new();

        for (category, category_dir) in subdirectories(fs, root)? {
            let mut cases = Vec::new();
            for (model_dir_name, model_dir) in subdirectories(fs, &category_dir)? {
                if model_dir_name == layout.module_dir {
                    continue;
                }
                let (model_name, model_tags) = parse_model_dir_name(&model_dir_name);

                for (case_dir_name, case_dir) in subdirectories(fs, &model_dir)? {
                    if !is_file(fs, &case_dir.join(&layout.flagfile))? {
                        log::debug!("Skipping {}: no {}", case_dir.display(), layout.flagfile);
                        continue;
                    }

                    let (driver, target_arch, bench_mode) =
                        parse_case_dir_name(&case_dir_name).ok_or_else(|| {
                            CompileStatsError::InvalidCaseDirectory {
                                path: case_dir.clone(),
                                reason: "expected <driver>__<target-arch>__<modes>".to_string(),
                            }
                        })?;
                    let mode = load_mode(fs, &case_dir, bench_mode)?;

                    cases.push(BenchmarkCase {
                        model_name: model_name.clone(),
                        model_tags: model_tags.clone(),
                        driver,
                        target_arch,
                        benchmark_case_dir: Some(case_dir),
                        mode,
                    });
                }
            }

            log::debug!("Category {}: {} benchmark cases", category, cases.len());
            categories.insert(
                category,
                Category {
                    dir: category_dir,
                    cases,
                },
            );
        }

        Ok(Self { categories })
    }

    /// Total number of cases across all categories
    pub fn case_count(&self) -> usize {
        self.categories.values().map(|c| c.cases.len()).sum()
    }
}

impl BenchmarkSuite for SuiteDirectory {
    fn list_categories(&self) -> Vec<(String, PathBuf)> {
        self.categories
            .iter()
            .map(|(name, category)| (name.clone(), category.dir.clone()))
            .collect()
    }

    fn filter_benchmarks_for_category(
        &self,
        category: &str,
        filter: &CaseFilter,
    ) -> Vec<BenchmarkCase> {
        self.categories
            .get(category)
            .map(|category| {
                category
                    .cases
                    .iter()
                    .filter(|case| filter.matches(case))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Split `MobileNetV2-fp32,imagenet` into the model name and its tags
fn parse_model_dir_name(name: &str) -> (String, Vec<String>) {
    match name.split_once('-') {
        Some((model, tags)) => (model.to_string(), split_list(tags)),
        None => (name.to_string(), Vec::new()),
    }
}

/// Split `iree-llvm-cpu__CPU-ARM64-v8A__big-core,full-inference`
fn parse_case_dir_name(name: &str) -> Option<(String, String, Vec<String>)> {
    let parts: Vec<&str> = name.split(CASE_NAME_SEPARATOR).collect();
    match parts.as_slice() {
        [driver, arch, modes] if !driver.is_empty() && !arch.is_empty() => {
            Some((driver.to_string(), arch.to_string(), split_list(modes)))
        }
        _ => None,
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_mode<FS: FileSystem>(
    fs: &FS,
    case_dir: &Path,
    bench_mode: Vec<String>,
) -> Result<BenchmarkMode, CompileStatsError> {
    let path = case_dir.join(RUN_CONFIG_FILE);
    let contents = match fs.read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(BenchmarkMode::Legacy { bench_mode });
        }
        Err(e) => return Err(CompileStatsError::io(format!("reading {}", path.display()), e)),
    };

    let run_config: RunConfig = serde_json::from_str(&contents)
        .map_err(|source| CompileStatsError::InvalidRunConfig { path, source })?;
    Ok(BenchmarkMode::Configured(run_config))
}

fn is_file<FS: FileSystem>(fs: &FS, path: &Path) -> Result<bool, CompileStatsError> {
    match fs.metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CompileStatsError::io(format!("reading {}", path.display()), e)),
    }
}

/// Child directories of `dir` sorted by name
fn subdirectories<FS: FileSystem>(
    fs: &FS,
    dir: &Path,
) -> Result<Vec<(String, PathBuf)>, CompileStatsError> {
    let read_error = |e: io::Error| CompileStatsError::io(format!("listing {}", dir.display()), e);

    let mut dirs = Vec::new();
    for entry in fs.read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();
        if !fs.metadata(&path).map_err(read_error)?.is_dir() {
            continue;
        }
        let name = entry.file_name().into_string().map_err(|_| {
            CompileStatsError::InvalidCaseDirectory {
                path: path.clone(),
                reason: "name is not valid UTF-8".to_string(),
            }
        })?;
        dirs.push((name, path));
    }
    dirs.sort();
    Ok(dirs)
}
