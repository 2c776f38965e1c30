//! Per-query hit selection.
//!
//! Two strategies are supported, chosen by input type:
//!
//! - [`SelectionStrategy::FirstHitPerQuery`] keeps the first record of each
//!   query that passes the thresholds. Used for proteins and CDS.
//! - [`SelectionStrategy::NonOverlappingSpans`] keeps every passing record
//!   whose query span does not overlap a span accepted before it. Used for
//!   genomes and metagenomes, where one query sequence may hold several gene
//!   calls.
//!
//! Both strategies trust the aligner's output order: hits for a query are
//! expected best-first. The result is greedy relative to that order, not a
//! global optimum.
//!
//! The overlap test in genome mode runs against *all* accepted hits, not
//! only those of the same query id.

use crate::error::Result;
use crate::filter::{FilterStats, Thresholds, Verdict};
use crate::overlap::{overlaps_any, Span};
use crate::record::{HitRecord, RecordReader};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How competing hits are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// At most one hit per query id
    FirstHitPerQuery,
    /// Any number of hits whose query spans are pairwise disjoint
    NonOverlappingSpans,
}

impl SelectionStrategy {
    /// Output ids get a per-query `_<n>` suffix when several hits per query can survive.
    pub fn suffixes_queries(&self) -> bool {
        matches!(self, SelectionStrategy::NonOverlappingSpans)
    }
}

/// An accepted hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedHit {
    /// Original query id, never suffixed
    pub query: String,
    pub target: String,
    pub evalue: f64,
    pub score: f64,
    /// Query coordinates, used only for overlap resolution
    pub query_span: Span,
    /// Subject coordinates, kept for reference
    pub subject_span: Span,
}

impl From<HitRecord> for SeedHit {
    fn from(record: HitRecord) -> Self {
        let query_span = record.query_span();
        let subject_span = record.subject_span();
        SeedHit {
            query: record.query,
            target: record.target,
            evalue: record.evalue,
            score: record.bitscore,
            query_span,
            subject_span,
        }
    }
}

/// Accepted hits in acceptance order, with counters.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub hits: Vec<SeedHit>,
    pub stats: FilterStats,
}

impl Selection {
    /// Distinct query ids that produced at least one hit.
    pub fn hit_queries(&self) -> HashSet<&str> {
        self.hits.iter().map(|h| h.query.as_str()).collect()
    }
}

/// Runs one selection pass over a record stream.
///
/// The first record error aborts the pass.
pub fn select<I>(records: I, thresholds: &Thresholds, strategy: SelectionStrategy) -> Result<Selection>
where
    I: IntoIterator<Item = Result<HitRecord>>,
{
    match strategy {
        SelectionStrategy::FirstHitPerQuery => select_first_per_query(records, thresholds),
        SelectionStrategy::NonOverlappingSpans => select_non_overlapping(records, thresholds),
    }
}

/// Runs [`select`] over a tabular file on disk.
pub fn select_file(
    path: &Path,
    thresholds: &Thresholds,
    strategy: SelectionStrategy,
) -> Result<Selection> {
    let reader = RecordReader::new(BufReader::new(File::open(path)?));
    select(reader, thresholds, strategy)
}

fn select_first_per_query<I>(records: I, thresholds: &Thresholds) -> Result<Selection>
where
    I: IntoIterator<Item = Result<HitRecord>>,
{
    let mut selection = Selection::default();
    let mut satisfied: HashSet<String> = HashSet::new();

    for record in records {
        let record = record?;
        selection.stats.total_processed += 1;

        if satisfied.contains(&record.query) {
            selection.stats.skipped_satisfied += 1;
            continue;
        }

        let verdict = thresholds.check(&record);
        if verdict != Verdict::Accept {
            selection.stats.record_verdict(verdict);
            continue;
        }

        satisfied.insert(record.query.clone());
        selection.hits.push(record.into());
        selection.stats.kept += 1;
    }

    Ok(selection)
}

fn select_non_overlapping<I>(records: I, thresholds: &Thresholds) -> Result<Selection>
where
    I: IntoIterator<Item = Result<HitRecord>>,
{
    let mut selection = Selection::default();

    for record in records {
        let record = record?;
        selection.stats.total_processed += 1;

        let verdict = thresholds.check(&record);
        if verdict != Verdict::Accept {
            selection.stats.record_verdict(verdict);
            continue;
        }

        if record.qstart > record.qend {
            log::debug!(
                "{}: reverse-strand hit {}..{} normalized",
                record.query,
                record.qstart,
                record.qend
            );
        }
        let hit = SeedHit::from(record);
        if overlaps_any(&hit.query_span, selection.hits.iter().map(|h| &h.query_span)) {
            selection.stats.skipped_overlap += 1;
            continue;
        }

        selection.hits.push(hit);
        selection.stats.kept += 1;
    }

    Ok(selection)
}
