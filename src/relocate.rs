use crate::demux_index::DemuxIndex;
use crate::fast5_index::Fast5Index;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Outcome of a relocation pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Files moved into a bucket directory.
    pub moved: usize,
    /// Read ids claimed by a group but absent from the fast5 index.
    pub unresolved: usize,
}

/// Move a file, falling back to copy+remove when rename fails (source and
/// destination may live on different filesystems).
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    fs::copy(source, destination)?;
    fs::remove_file(source)
}

/// Move every fast5 file claimed by the demultiplex index into its bucket
/// directory under `out_root`, preserving base names. This is the only
/// phase that mutates the fast5 tree; a moved file leaves its origin, so a
/// re-run after interruption re-indexes only the files still in place.
///
/// A read with no fast5 entry is reported and tallied, never fatal. A
/// filesystem failure moving a particular file aborts with the read id,
/// source and destination in the error, since no rollback exists.
pub fn move_fast5(
    fast5_index: &Fast5Index,
    demux_index: &DemuxIndex,
    out_root: &Path,
) -> Result<MoveReport> {
    let mut report = MoveReport::default();

    for (group, read_ids) in demux_index.iter() {
        let bucket = out_root.join(&group.status).join(&group.barcode);
        fs::create_dir_all(&bucket)
            .with_context(|| format!("Failed to create bucket {}", bucket.display()))?;

        for read_id in read_ids {
            let Some(source) = fast5_index.get(read_id) else {
                log::warn!("No fast5 found for read {read_id} ({group})");
                report.unresolved += 1;
                continue;
            };
            // Source paths come from the index, so file_name is always set
            let destination = match source.file_name() {
                Some(name) => bucket.join(name),
                None => continue,
            };
            move_file(source, &destination).with_context(|| {
                format!(
                    "Failed to move read {read_id}: {} -> {}",
                    source.display(),
                    destination.display()
                )
            })?;
            report.moved += 1;
        }
    }

    Ok(report)
}
