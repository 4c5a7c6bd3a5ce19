//! Module component size classification
//!
//! Compiled modules built for statistics are zip containers with a flat list of
//! entries: the VM bytecode, the constant pool and one entry per device dispatch
//! executable. Every entry must land in exactly one bucket; an entry nobody
//! recognizes is an error rather than silently uncounted bytes.

use super::types::ModuleComponentSizes;
use crate::config::ComponentConfig;
use crate::error::CompileStatsError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Seek};

/// Classifies module container entries into size buckets
#[derive(Debug, Clone)]
pub struct ComponentClassifier {
    vm_component: String,
    const_component: String,
    dispatch_patterns: Vec<Regex>,
}

impl Default for ComponentClassifier {
    fn default() -> Self {
        // Built-in patterns are known to compile.
        Self::new(&ComponentConfig::default()).expect("default dispatch patterns are valid")
    }
}

impl ComponentClassifier {
    /// Build a classifier from component naming rules
    ///
    /// Patterns are anchored so they must match the whole entry name.
    pub fn new(config: &ComponentConfig) -> Result<Self, CompileStatsError> {
        let dispatch_patterns = config
            .dispatch_patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                    CompileStatsError::InvalidConfig(format!(
                        "invalid dispatch pattern '{}': {}",
                        pattern, e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            vm_component: config.vm_component.clone(),
            const_component: config.const_component.clone(),
            dispatch_patterns,
        })
    }

    /// Read the container directory of a module and classify its entries
    ///
    /// `file_bytes` is the size of the module file on disk; entry sizes are
    /// the uncompressed sizes recorded in the container.
    pub fn classify<R: Read + Seek>(
        &self,
        module: R,
        file_bytes: u64,
    ) -> Result<ModuleComponentSizes, CompileStatsError> {
        let entries = read_entry_sizes(module)?;
        self.classify_entries(&entries, file_bytes)
    }

    /// Classify an already-read entry name to size map
    ///
    /// # Examples
    ///
    /// ```
    /// use compile_stats::stats::ComponentClassifier;
    /// use std::collections::BTreeMap;
    ///
    /// let entries = BTreeMap::from([
    ///     ("module.fb".to_string(), 100),
    ///     ("_const.bin".to_string(), 50),
    ///     ("x_embedded_elf_arch.so".to_string(), 30),
    /// ]);
    ///
    /// let sizes = ComponentClassifier::default()
    ///     .classify_entries(&entries, 180)
    ///     .unwrap();
    /// assert_eq!(sizes.file_bytes, 180);
    /// assert_eq!(sizes.vm_component_bytes, 100);
    /// assert_eq!(sizes.const_component_bytes, 50);
    /// assert_eq!(sizes.total_dispatch_component_bytes, 30);
    /// ```
    pub fn classify_entries(
        &self,
        entries: &BTreeMap<String, u64>,
        file_bytes: u64,
    ) -> Result<ModuleComponentSizes, CompileStatsError> {
        let vm_component_bytes = self.required(entries, &self.vm_component)?;
        let const_component_bytes = self.required(entries, &self.const_component)?;

        let mut identified: BTreeSet<&str> =
            BTreeSet::from([self.vm_component.as_str(), self.const_component.as_str()]);
        let mut total_dispatch_component_bytes = 0u64;

        for (name, size) in entries {
            if identified.contains(name.as_str()) {
                continue;
            }
            if self.dispatch_patterns.iter().any(|re| re.is_match(name)) {
                total_dispatch_component_bytes += size;
                identified.insert(name.as_str());
            }
        }

        let unrecognized: Vec<String> = entries
            .keys()
            .filter(|name| !identified.contains(name.as_str()))
            .cloned()
            .collect();
        if !unrecognized.is_empty() {
            return Err(CompileStatsError::UnrecognizedComponents {
                names: unrecognized,
            });
        }

        Ok(ModuleComponentSizes {
            file_bytes,
            vm_component_bytes,
            const_component_bytes,
            total_dispatch_component_bytes,
        })
    }

    fn required(&self, entries: &BTreeMap<String, u64>, name: &str) -> Result<u64, CompileStatsError> {
        entries
            .get(name)
            .copied()
            .ok_or_else(|| CompileStatsError::MissingComponent {
                name: name.to_string(),
            })
    }
}

/// Read entry names and uncompressed sizes from a zip container
///
/// Entries are not decompressed; only the central directory is consulted.
pub fn read_entry_sizes<R: Read + Seek>(
    module: R,
) -> Result<BTreeMap<String, u64>, CompileStatsError> {
    let mut archive = zip::ZipArchive::new(module)?;
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        entries.insert(entry.name().to_string(), entry.size());
    }
    Ok(entries)
}
