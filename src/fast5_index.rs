use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FAST5_SUFFIX: &str = ".fast5";

/// Index of single-read fast5 files keyed by read id (file name minus the
/// `.fast5` suffix). Built once by a read-only walk, consumed by relocation.
#[derive(Debug, Default)]
pub struct Fast5Index {
    paths: HashMap<String, PathBuf>,
    duplicates: usize,
}

impl Fast5Index {
    /// Walk a directory tree and index every `*.fast5` file at any depth.
    /// Duplicate read ids are reported and resolved last-writer-wins.
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Fast5Index> {
        let root = root.as_ref();
        let mut index = Fast5Index::default();

        for entry in WalkDir::new(root) {
            let entry = entry
                .with_context(|| format!("Failed to walk fast5 tree {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = match entry.file_name().to_str() {
                Some(name) => name,
                None => continue,
            };
            let Some(read_id) = name.strip_suffix(FAST5_SUFFIX) else {
                continue;
            };

            if let Some(previous) =
                index.paths.insert(read_id.to_string(), entry.path().to_path_buf())
            {
                index.duplicates += 1;
                log::warn!(
                    "Duplicate fast5 for read {read_id}: keeping {}, ignoring {}",
                    entry.path().display(),
                    previous.display()
                );
            }
        }

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of read ids that appeared more than once during the scan.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn get(&self, read_id: &str) -> Option<&Path> {
        self.paths.get(read_id).map(PathBuf::as_path)
    }
}
