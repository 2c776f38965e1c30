//! Tabular alignment records as written by the aligner.
//!
//! DIAMOND's default output has 12 tab-separated columns:
//! `qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore`.
//! No header row is written; lines starting with `#` are comments.

use crate::error::{Result, SearchError};
use crate::overlap::Span;
use std::io::BufRead;
use std::str::FromStr;

/// Number of columns in the default tabular format.
pub const TABULAR_COLUMNS: usize = 12;

/// One alignment between a query and a target sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    /// Query sequence id
    pub query: String,
    /// Target sequence id
    pub target: String,
    /// Percentage of identical positions (0-100)
    pub pident: f64,
    /// Alignment length
    pub length: u64,
    /// Number of mismatches
    pub mismatches: u64,
    /// Number of gap openings
    pub gap_opens: u64,
    /// Query start (1-based, inclusive)
    pub qstart: u64,
    /// Query end (1-based, inclusive)
    pub qend: u64,
    /// Subject start (1-based, inclusive)
    pub sstart: u64,
    /// Subject end (1-based, inclusive)
    pub send: u64,
    /// Expect value, lower is better
    pub evalue: f64,
    /// Bit score, higher is better
    pub bitscore: f64,
}

impl HitRecord {
    /// Returns true for lines that carry no record: blank lines and comments.
    pub fn is_skippable(line: &str) -> bool {
        line.trim().is_empty() || line.starts_with('#')
    }

    /// Parses one tabular line. `line_no` is 1-based and only used in errors.
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        if fields.len() < TABULAR_COLUMNS {
            return Err(SearchError::malformed(
                line_no,
                format!(
                    "line has {} fields, expected {TABULAR_COLUMNS}",
                    fields.len()
                ),
            ));
        }

        Ok(HitRecord {
            query: fields[0].to_string(),
            target: fields[1].to_string(),
            pident: parse_field(fields[2], "pident", line_no)?,
            length: parse_field(fields[3], "length", line_no)?,
            mismatches: parse_field(fields[4], "mismatch", line_no)?,
            gap_opens: parse_field(fields[5], "gapopen", line_no)?,
            qstart: parse_field(fields[6], "qstart", line_no)?,
            qend: parse_field(fields[7], "qend", line_no)?,
            sstart: parse_field(fields[8], "sstart", line_no)?,
            send: parse_field(fields[9], "send", line_no)?,
            evalue: parse_field(fields[10], "evalue", line_no)?,
            bitscore: parse_field(fields[11], "bitscore", line_no)?,
        })
    }

    /// Query coordinates as a closed interval with `start <= end`.
    pub fn query_span(&self) -> Span {
        Span::new(self.qstart, self.qend)
    }

    /// Subject coordinates as a closed interval with `start <= end`.
    pub fn subject_span(&self) -> Span {
        Span::new(self.sstart, self.send)
    }
}

fn parse_field<T: FromStr>(value: &str, name: &str, line_no: usize) -> Result<T> {
    value
        .parse()
        .map_err(|_| SearchError::malformed(line_no, format!("invalid {name} '{value}'")))
}

/// Streams records out of a tabular file, skipping comments and blank lines.
pub struct RecordReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        RecordReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<HitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if HitRecord::is_skippable(&line) {
                continue;
            }
            return Some(HitRecord::from_line(&line, self.line_no));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINE: &str = "q1\t9606.ENSP01\t87.5\t120\t15\t0\t1\t360\t5\t124\t1.2e-50\t210.3";

    #[test]
    fn test_parse_record() {
        let record = HitRecord::from_line(LINE, 1).unwrap();
        assert_eq!(record.query, "q1");
        assert_eq!(record.target, "9606.ENSP01");
        assert_eq!(record.pident, 87.5);
        assert_eq!(record.length, 120);
        assert_eq!(record.qstart, 1);
        assert_eq!(record.qend, 360);
        assert_eq!(record.sstart, 5);
        assert_eq!(record.send, 124);
        assert_eq!(record.evalue, 1.2e-50);
        assert_eq!(record.bitscore, 210.3);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let record = HitRecord::from_line(&format!("{LINE} \r"), 1).unwrap();
        assert_eq!(record.bitscore, 210.3);
    }

    #[test]
    fn test_reversed_query_span_is_normalized() {
        let line = "q1\tt1\t50\t10\t0\t0\t300\t271\t1\t10\t1e-3\t30";
        let record = HitRecord::from_line(line, 1).unwrap();
        assert_eq!(record.query_span(), Span::new(271, 300));
        assert_eq!(record.query_span().start, 271);
    }

    #[test]
    fn test_non_numeric_column_is_malformed() {
        let line = LINE.replace("87.5", "high");
        match HitRecord::from_line(&line, 7) {
            Err(SearchError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 7);
                assert!(reason.contains("pident"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_short_line_is_malformed() {
        assert!(matches!(
            HitRecord::from_line("q1\tt1\t99.0", 3),
            Err(SearchError::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn test_reader_skips_comments_and_blank_lines() {
        let text = format!("# diamond v2\n\n{LINE}\n   \n{LINE}\n");
        let records: Vec<_> = RecordReader::new(Cursor::new(text))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_reader_reports_physical_line_number() {
        let text = format!("# header\n{LINE}\nq2\tt2\tx\n");
        let results: Vec<_> = RecordReader::new(Cursor::new(text)).collect();
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(SearchError::MalformedRecord { line: 3, .. })
        ));
    }
}
