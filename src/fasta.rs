//! Query id enumeration for the no-hit report.

use crate::error::{Result, SearchError};
use needletail::errors::ParseErrorKind;
use std::collections::BTreeSet;
use std::path::Path;

/// Reads the ids of all sequences in a FASTA (or FASTQ) file, compressed or not.
///
/// The id is the header up to the first whitespace, which is what the
/// aligner reports as `qseqid`.
pub fn query_ids(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Err(SearchError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = match needletail::parse_fastx_file(path) {
        Ok(reader) => reader,
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => {
            log::debug!("{} is empty", path.display());
            return Ok(BTreeSet::new());
        }
        Err(e) => return Err(SearchError::FastaParse(format!("{}: {e}", path.display()))),
    };

    let mut ids = BTreeSet::new();
    while let Some(record) = reader.next() {
        let record =
            record.map_err(|e| SearchError::FastaParse(format!("{}: {e}", path.display())))?;
        ids.insert(header_id(record.id()));
    }
    log::debug!("{} query ids read from {}", ids.len(), path.display());

    Ok(ids)
}

fn header_id(header: &[u8]) -> String {
    let header = String::from_utf8_lossy(header);
    header
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}
