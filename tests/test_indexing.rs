/// Indexing tests for the fast5 and fastq tree scans
///
/// Builds synthetic trees in temp directories and checks that both indexes
/// see exactly the files they should, regardless of layout depth.
use anyhow::Result;
use fast5_demux::demux_index::DemuxIndex;
use fast5_demux::fast5_index::Fast5Index;
use fast5_demux::fastq;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fastq(path: &Path, ids: &[&str]) -> Result<()> {
    let mut content = String::new();
    for id in ids {
        content.push_str(&format!("@{id} runid=abc ch=42\nACGTACGT\n+\nIIIIIIII\n"));
    }
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, content)?;
    Ok(())
}

#[test]
fn fast5_index_one_entry_per_file() -> Result<()> {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("batch_0"))?;
    fs::create_dir_all(dir.path().join("batch_1/deep/deeper"))?;
    fs::write(dir.path().join("batch_0/r1.fast5"), b"")?;
    fs::write(dir.path().join("batch_1/r2.fast5"), b"")?;
    fs::write(dir.path().join("batch_1/deep/deeper/r3.fast5"), b"")?;
    // Non-fast5 files are ignored
    fs::write(dir.path().join("batch_0/sequencing_summary.txt"), b"")?;

    let index = Fast5Index::scan(dir.path())?;
    assert_eq!(index.len(), 3);
    for id in ["r1", "r2", "r3"] {
        let path = index.get(id).unwrap();
        assert!(path.is_absolute() || path.starts_with(dir.path()));
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), format!("{id}.fast5"));
    }
    Ok(())
}

#[test]
fn record_count_is_line_count_over_four() -> Result<()> {
    let dir = TempDir::new()?;
    let file = dir.path().join("reads.fastq");
    let ids: Vec<String> = (0..25).map(|i| format!("read-{i}")).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    write_fastq(&file, &id_refs)?;

    let lines = fs::read_to_string(&file)?.lines().count();
    let extracted = fastq::read_ids(&file)?;
    assert_eq!(extracted.len(), lines / 4);
    assert_eq!(extracted, ids);
    Ok(())
}

#[test]
fn grouping_is_concatenation_over_files() -> Result<()> {
    // Scanning two files of one group must equal scanning their concatenation
    let split = TempDir::new()?;
    write_fastq(&split.path().join("pass/barcode03/a.fastq"), &["r1", "r2"])?;
    write_fastq(&split.path().join("pass/barcode03/b.fastq"), &["r3", "r4"])?;

    let merged = TempDir::new()?;
    write_fastq(
        &merged.path().join("pass/barcode03/all.fastq"),
        &["r1", "r2", "r3", "r4"],
    )?;

    let split_index = DemuxIndex::scan(split.path())?;
    let merged_index = DemuxIndex::scan(merged.path())?;

    assert_eq!(split_index.group_count(), merged_index.group_count());
    assert_eq!(split_index.total_reads(), merged_index.total_reads());

    let mut split_reads: Vec<String> = split_index.iter().flat_map(|(_, v)| v.clone()).collect();
    let mut merged_reads: Vec<String> = merged_index.iter().flat_map(|(_, v)| v.clone()).collect();
    split_reads.sort();
    merged_reads.sort();
    assert_eq!(split_reads, merged_reads);
    Ok(())
}

#[test]
fn duplicate_reads_within_a_group_are_preserved() -> Result<()> {
    let dir = TempDir::new()?;
    write_fastq(&dir.path().join("pass/barcode01/a.fastq"), &["r1"])?;
    write_fastq(&dir.path().join("pass/barcode01/b.fastq"), &["r1"])?;

    let index = DemuxIndex::scan(dir.path())?;
    assert_eq!(index.total_reads(), 2);
    Ok(())
}
