use crate::demux_index::DemuxIndex;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Name of the ont_fast5_api tool that consolidates single-read fast5
/// files into multi-read files. Resolved from PATH.
pub const PACKER: &str = "single_to_multi_fast5";

/// Invoke the packer on one bucket, blocking until it exits. The packer
/// manages its own parallelism from the thread-count hint; its exit status
/// is reported but not treated as fatal.
fn pack_bucket(input: &Path, output: &Path, threads: usize) -> Result<()> {
    let status = Command::new(PACKER)
        .arg("-i")
        .arg(input)
        .arg("-s")
        .arg(output)
        .arg("-t")
        .arg(threads.to_string())
        .status()
        .with_context(|| format!("Failed to run {PACKER}, is it on PATH?"))?;

    if !status.success() {
        log::warn!("{PACKER} exited with {status} for {}", input.display());
    }
    Ok(())
}

/// Convert every bucket of single-read fast5 files under `single_root`
/// into multi-read files under `multi_root`, one packer invocation per
/// (status, barcode) group in the index.
pub fn pack_buckets(
    demux_index: &DemuxIndex,
    single_root: &Path,
    multi_root: &Path,
    threads: usize,
) -> Result<()> {
    for (group, _) in demux_index.iter() {
        let input = single_root.join(&group.status).join(&group.barcode);
        let output = multi_root.join(&group.status).join(&group.barcode);
        fs::create_dir_all(&output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        log::info!("Packing {group}...");
        pack_bucket(&input, &output, threads)?;
    }
    Ok(())
}
