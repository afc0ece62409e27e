use crate::fastq;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

/// One demultiplexing bucket: basecall status ("pass"/"fail") plus barcode
/// label ("barcode01".."barcode96", "unclassified").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub status: String,
    pub barcode: String,
}

impl GroupKey {
    /// Derive the group of a FASTQ file from its location under the
    /// basecalled root. The tree must have the fixed shape
    /// `<root>/<status>/<barcode>/<file>`; any other depth is rejected
    /// rather than silently misgrouped.
    pub fn from_path(root: &Path, file: &Path) -> Result<GroupKey> {
        let relative = file.strip_prefix(root).with_context(|| {
            format!(
                "{} is not under the basecalled root {}",
                file.display(),
                root.display()
            )
        })?;

        let segments: Vec<&str> = relative
            .iter()
            .map(|s| s.to_str().context("Non-UTF-8 path segment"))
            .collect::<Result<_>>()?;

        match segments.as_slice() {
            [status, barcode, _file] => Ok(GroupKey {
                status: (*status).to_string(),
                barcode: (*barcode).to_string(),
            }),
            _ => bail!(
                "Unexpected basecalled tree layout: {} should sit at \
                 <root>/<status>/<barcode>/<file>",
                file.display()
            ),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.status, self.barcode)
    }
}

fn is_fastq(name: &str) -> bool {
    name.ends_with(".fastq") || name.ends_with(".fastq.gz")
}

/// Index of read ids per demultiplexing group, in file encounter order.
/// Duplicate ids within a group are preserved as scanned.
#[derive(Debug, Default)]
pub struct DemuxIndex {
    groups: IndexMap<GroupKey, Vec<String>>,
}

impl DemuxIndex {
    /// Walk the basecalled tree and collect the read ids of every FASTQ
    /// file into its group. Each file is parsed exactly once; a file that
    /// yields no records contributes nothing, so a group observed only
    /// through empty files never gets an entry.
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<DemuxIndex> {
        let root = root.as_ref();
        let mut index = DemuxIndex::default();

        for entry in WalkDir::new(root) {
            let entry = entry
                .with_context(|| format!("Failed to walk basecalled tree {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry.file_name().to_str().is_some_and(is_fastq);
            if !matches {
                continue;
            }

            let key = GroupKey::from_path(root, entry.path())?;
            let ids = fastq::read_ids(entry.path())?;
            log::debug!("{}: {} reads in {key}", entry.path().display(), ids.len());
            if !ids.is_empty() {
                index.groups.entry(key).or_default().extend(ids);
            }
        }

        Ok(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Vec<String>)> {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn total_reads(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub fn get(&self, status: &str, barcode: &str) -> Option<&Vec<String>> {
        self.groups.get(&GroupKey {
            status: status.to_string(),
            barcode: barcode.to_string(),
        })
    }
}
