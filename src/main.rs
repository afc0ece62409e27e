mod demux_index;
mod fast5_index;
mod fastq;
mod pack;
mod relocate;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use crate::demux_index::DemuxIndex;
use crate::fast5_index::Fast5Index;

/// fast5-demux - Reorganize single-read fast5 files according to nanopore
/// demultiplexing results
///
/// The basecaller records its demultiplexing decision in the shape of its
/// FASTQ output tree (<status>/<barcode>/<file>). This tool moves each raw
/// fast5 file into the matching bucket, then packs every bucket into
/// multi-read fast5 files. WARNING: roughly twice the disk footprint of
/// the fast5 folder is required during the packing step.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Basecaller output folder (the "save_path" handed to the basecaller)
    #[clap(short = 'b', long = "basecalled", value_name = "DIR")]
    basecalled: PathBuf,

    /// Parent folder holding the single-read fast5 files
    #[clap(short = 's', long = "singles", value_name = "DIR")]
    singles: PathBuf,

    /// Folder where demultiplexed fast5 files are assembled
    #[clap(short = 'd', long = "demultiplexed", value_name = "DIR")]
    demultiplexed: PathBuf,

    /// Number of threads to forward to the fast5 packer
    #[clap(short = 't', long = "threads", default_value_t = num_cpus::get())]
    threads: usize,
}

fn run(args: &Args) -> Result<()> {
    if !args.basecalled.is_dir() {
        bail!("Basecalled folder {} does not exist", args.basecalled.display());
    }
    if !args.singles.is_dir() {
        bail!("Single fast5 folder {} does not exist", args.singles.display());
    }
    if args.threads == 0 {
        bail!("Thread count must be at least 1");
    }

    log::info!("Listing fast5 reads in {}...", args.singles.display());
    let fast5_index = Fast5Index::scan(&args.singles)?;
    log::info!("Found {} fast5 files.", fast5_index.len());
    if fast5_index.duplicate_count() > 0 {
        log::warn!(
            "{} read ids appeared more than once in the fast5 tree",
            fast5_index.duplicate_count()
        );
    }

    log::info!("Listing demultiplexed fastq reads in {}...", args.basecalled.display());
    let demux_index = DemuxIndex::scan(&args.basecalled)?;
    log::info!(
        "Found {} reads across {} groups.",
        demux_index.total_reads(),
        demux_index.group_count()
    );

    log::info!("Reorganizing fast5 according to demultiplexing output...");
    let report = relocate::move_fast5(&fast5_index, &demux_index, &args.demultiplexed)?;
    log::info!("Moved {} fast5 files.", report.moved);
    if report.unresolved > 0 {
        log::warn!("{} reads had no matching fast5 file", report.unresolved);
    }
    let unclaimed = fast5_index.len() - report.moved;
    if unclaimed > 0 {
        log::info!("{unclaimed} fast5 files were claimed by no group and left in place.");
    }

    // Pack into a sibling tree, then swap it in over the single-file tree
    let multi_root = {
        let mut name = args.demultiplexed.as_os_str().to_owned();
        name.push("_multi");
        PathBuf::from(name)
    };
    log::info!("Converting single fast5 to multi fast5...");
    pack::pack_buckets(&demux_index, &args.demultiplexed, &multi_root, args.threads)?;

    log::info!("Deleting temporary files...");
    fs::remove_dir_all(&args.demultiplexed)
        .with_context(|| format!("Failed to delete {}", args.demultiplexed.display()))?;
    fs::rename(&multi_root, &args.demultiplexed).with_context(|| {
        format!(
            "Failed to rename {} -> {}",
            multi_root.display(),
            args.demultiplexed.display()
        )
    })?;

    log::info!("Done!");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(&args)
}
