//! Writes accepted hits as a seed ortholog table.
//!
//! Both output flavours share one writer. [`QueryNaming`] decides whether
//! query ids are written verbatim or with a per-query `_<n>` suffix; query
//! and subject spans are never written.

use crate::error::Result;
use crate::selector::{SeedHit, SelectionStrategy};
use chrono::Local;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// How query ids appear in the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryNaming {
    /// `query`
    Verbatim,
    /// `query_<n>`, `n` counting from zero per original query in acceptance order
    SpanSuffixed,
}

impl From<SelectionStrategy> for QueryNaming {
    fn from(strategy: SelectionStrategy) -> Self {
        if strategy.suffixes_queries() {
            QueryNaming::SpanSuffixed
        } else {
            QueryNaming::Verbatim
        }
    }
}

/// Comment block written ahead of the hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// Provenance lines, each starting with `##`
    pub call_info: String,
    /// Aligner command line, written after a `#`
    pub command: String,
}

impl Preamble {
    pub fn new(call_info: impl Into<String>, command: impl Into<String>) -> Self {
        Preamble {
            call_info: call_info.into(),
            command: command.into(),
        }
    }

    /// Preamble stamped with the current time, crate version and process arguments.
    pub fn for_command(command: impl Into<String>) -> Self {
        Preamble::new(call_info(), command)
    }
}

/// Provenance block: timestamp, program version and command line.
pub fn call_info() -> String {
    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    format!(
        "## {}\n## {} {}\n## {}\n##",
        Local::now().format("%a %b %e %H:%M:%S %Y"),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        argv.join(" ")
    )
}

/// Writes the table to any writer. Output depends only on the arguments.
pub fn write_hits<W: Write>(
    mut out: W,
    hits: &[SeedHit],
    naming: QueryNaming,
    preamble: Option<&Preamble>,
) -> Result<()> {
    if let Some(preamble) = preamble {
        writeln!(out, "{}", preamble.call_info)?;
        writeln!(out, "#{}", preamble.command)?;
    }

    let mut suffixes: HashMap<&str, usize> = HashMap::new();
    for hit in hits {
        let evalue = format_float(hit.evalue);
        let score = format_float(hit.score);
        match naming {
            QueryNaming::Verbatim => {
                writeln!(out, "{}\t{}\t{}\t{}", hit.query, hit.target, evalue, score)?;
            }
            QueryNaming::SpanSuffixed => {
                let counter = suffixes.entry(hit.query.as_str()).or_insert(0);
                let suffix = *counter;
                *counter += 1;
                writeln!(
                    out,
                    "{}_{}\t{}\t{}\t{}",
                    hit.query, suffix, hit.target, evalue, score
                )?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the table into it.
pub fn write_hits_to_path(
    path: &Path,
    hits: &[SeedHit],
    naming: QueryNaming,
    preamble: Option<&Preamble>,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_hits(&mut writer, hits, naming, preamble)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(())
}

/// Shortest round-trip rendering of a float.
///
/// Scientific notation is used when the decimal exponent is below -4 or at
/// least 16, with a signed two-digit exponent (`1e-50`, `1.5e-05`). Integral
/// values keep a `.0` (`250.0`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{value:e}");
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if value == 0.0 || (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::Span;
    use pretty_assertions::assert_eq;

    fn hit(query: &str, target: &str, evalue: f64, score: f64, qstart: u64, qend: u64) -> SeedHit {
        SeedHit {
            query: query.to_string(),
            target: target.to_string(),
            evalue,
            score,
            query_span: Span::new(qstart, qend),
            subject_span: Span::new(1, 100),
        }
    }

    fn render(hits: &[SeedHit], naming: QueryNaming, preamble: Option<&Preamble>) -> String {
        let mut buf = Vec::new();
        write_hits(&mut buf, hits, naming, preamble).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1e-50), "1e-50");
        assert_eq!(format_float(1.2e-50), "1.2e-50");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.001), "0.001");
        assert_eq!(format_float(250.0), "250.0");
        assert_eq!(format_float(210.3), "210.3");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_verbatim_table() {
        let hits = vec![
            hit("A", "9606.P1", 1e-50, 210.3, 1, 100),
            hit("C", "10090.P2", 0.0002, 55.0, 1, 100),
        ];
        assert_eq!(
            render(&hits, QueryNaming::Verbatim, None),
            "A\t9606.P1\t1e-50\t210.3\nC\t10090.P2\t0.0002\t55.0\n"
        );
    }

    #[test]
    fn test_suffix_numbering_follows_acceptance_order() {
        let hits = vec![
            hit("Q1", "t1", 1e-30, 300.0, 500, 800),
            hit("Q1", "t2", 1e-20, 200.0, 1, 100),
            hit("Q2", "t3", 1e-10, 100.0, 1000, 1100),
            hit("Q1", "t4", 1e-5, 90.0, 200, 300),
        ];
        let table = render(&hits, QueryNaming::SpanSuffixed, None);
        let ids: Vec<_> = table
            .lines()
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["Q1_0", "Q1_1", "Q2_0", "Q1_2"]);
        assert!(!table.contains("500"));
    }

    #[test]
    fn test_suffix_numbering_grouped_queries() {
        let hits = vec![
            hit("Q1", "a", 1e-9, 80.0, 1, 10),
            hit("Q1", "b", 1e-9, 80.0, 20, 30),
            hit("Q1", "c", 1e-9, 80.0, 40, 50),
            hit("Q2", "d", 1e-9, 80.0, 60, 70),
        ];
        let table = render(&hits, QueryNaming::SpanSuffixed, None);
        let ids: Vec<_> = table
            .lines()
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["Q1_0", "Q1_1", "Q1_2", "Q2_0"]);
    }

    #[test]
    fn test_preamble_written_before_hits() {
        let preamble = Preamble::new("## now\n## diamond-seeds 0.1.0\n## prog\n##", "diamond blastp -d db");
        let hits = vec![hit("A", "t", 1e-9, 80.0, 1, 10)];
        assert_eq!(
            render(&hits, QueryNaming::Verbatim, Some(&preamble)),
            "## now\n## diamond-seeds 0.1.0\n## prog\n##\n#diamond blastp -d db\nA\tt\t1e-09\t80.0\n"
        );
    }

    #[test]
    fn test_output_is_reproducible() {
        let preamble = Preamble::for_command("diamond blastx");
        let hits = vec![
            hit("Q1", "t1", 1e-30, 300.0, 1, 100),
            hit("Q1", "t2", 1e-20, 200.0, 200, 300),
        ];
        for naming in [QueryNaming::Verbatim, QueryNaming::SpanSuffixed] {
            for p in [None, Some(&preamble)] {
                assert_eq!(render(&hits, naming, p), render(&hits, naming, p));
            }
        }
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.tsv");
        let hits = vec![hit("A", "t", 1e-9, 80.0, 1, 10)];

        write_hits_to_path(&path, &hits, QueryNaming::Verbatim, None).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_hits_to_path(&path, &hits, QueryNaming::Verbatim, None).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
        assert_eq!(String::from_utf8(first).unwrap(), "A\tt\t1e-09\t80.0\n");
    }

    #[test]
    fn test_call_info_shape() {
        let info = call_info();
        let lines: Vec<_> = info.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.starts_with("##")));
        assert!(lines[1].contains(env!("CARGO_PKG_VERSION")));
    }
}
