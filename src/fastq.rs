use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a FASTQ file and auto-detect gzip compression, returning a boxed BufRead
pub fn open_fastq_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    // Check by file extension (gzip members may be concatenated, hence MultiGzDecoder)
    let is_compressed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    if is_compressed {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Extract the read id from a FASTQ header line: first whitespace-delimited
/// token, with the leading '@' stripped if present.
fn header_read_id(header: &str) -> Option<String> {
    let token = header.split_ascii_whitespace().next()?;
    Some(token.strip_prefix('@').unwrap_or(token).to_string())
}

/// Stream a FASTQ file (plain or gzipped) and collect the read id of every
/// 4-line record, in file order. Only header lines are inspected; sequence,
/// separator and quality lines are consumed to keep the record cursor aligned.
pub fn read_ids<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let reader = open_fastq_input(path)?;

    let mut ids = Vec::new();
    let mut line_in_record = 0usize;
    let mut total_lines = 0usize;

    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        total_lines += 1;
        if line_in_record == 0 {
            if let Some(id) = header_read_id(&line) {
                ids.push(id);
            }
        }
        line_in_record = (line_in_record + 1) % 4;
    }

    if total_lines % 4 != 0 {
        log::warn!(
            "{}: {} lines is not a multiple of 4, trailing record is truncated",
            path.display(),
            total_lines
        );
    }

    Ok(ids)
}
