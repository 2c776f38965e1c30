//! Seed ortholog search driven by the DIAMOND binary.
//!
//! A search runs the aligner once inside a private temporary workspace,
//! selects hits from its tabular output in one pass and writes the seed
//! ortholog table. The workspace is removed on every exit path.

use crate::binary_finder::find_diamond;
use crate::config::Config;
use crate::emitter::{write_hits_to_path, Preamble};
use crate::error::{Result, SearchError};
use crate::fasta;
use crate::filter::{FilterStats, Thresholds};
use crate::runner::DiamondCommand;
use crate::selector::{select_file, SeedHit, Selection, SelectionStrategy};
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

/// Prefix of the per-search workspace directory.
pub const WORKSPACE_PREFIX: &str = "emappertmp_dmdn_";

const RAW_OUTPUT_NAME: &str = "raw_hits.tsv";

/// Runs seed ortholog searches with a fixed configuration.
///
/// The searcher holds no per-search state, so one instance can serve
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct DiamondSearcher {
    config: Config,
}

/// What a finished search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Accepted hits in acceptance order
    pub hits: Vec<SeedHit>,
    /// Selection counters
    pub stats: FilterStats,
    /// Aligner command line as run
    pub command: String,
    pub strategy: SelectionStrategy,
}

impl DiamondSearcher {
    /// Create a searcher after validating the configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(DiamondSearcher { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Aligns `query_fasta` against the configured database and writes the
    /// selected hits to `seed_orthologs`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the aligner cannot be found
    /// - the query file does not exist
    /// - the aligner exits with a failure status
    /// - a line of its output cannot be parsed
    /// - the output table cannot be written
    pub fn search(&self, query_fasta: &Path, seed_orthologs: &Path) -> Result<SearchOutcome> {
        let diamond = find_diamond(self.config.diamond_binary.as_deref())?;
        if !query_fasta.exists() {
            return Err(SearchError::FileNotFound(query_fasta.to_path_buf()));
        }

        let workspace = self.workspace()?;
        log::debug!("workspace {}", workspace.path().display());

        let raw_output = workspace.path().join(RAW_OUTPUT_NAME);
        let command = DiamondCommand::build(&self.config, &diamond, query_fasta, &raw_output);
        command.run()?;

        let strategy = self.config.input_type.strategy();
        let selection = self.parse(&raw_output, strategy)?;
        log_stats(&selection);

        let rendered = command.render();
        let preamble = (!self.config.no_file_comments).then(|| Preamble::for_command(&rendered));
        write_hits_to_path(
            seed_orthologs,
            &selection.hits,
            strategy.into(),
            preamble.as_ref(),
        )?;
        log::info!(
            "{} seed orthologs written to {}",
            selection.hits.len(),
            seed_orthologs.display()
        );

        workspace.close()?;

        Ok(SearchOutcome {
            hits: selection.hits,
            stats: selection.stats,
            command: rendered,
            strategy,
        })
    }

    fn workspace(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match &self.config.temp_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        dir.map_err(|e| SearchError::Other(format!("Failed to create temp directory: {e}")))
    }

    fn parse(&self, raw_output: &Path, strategy: SelectionStrategy) -> Result<Selection> {
        let thresholds = Thresholds::from(&self.config);
        select_file(raw_output, &thresholds, strategy).map_err(|e| match e {
            SearchError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                SearchError::InvocationFailure("aligner produced no output file".to_string())
            }
            other => other,
        })
    }
}

impl SearchOutcome {
    pub fn hits(&self) -> &[SeedHit] {
        &self.hits
    }

    /// Queries of `query_fasta` without any accepted hit.
    ///
    /// Hits keep the original query id, so this holds for suffixed genome
    /// output too.
    pub fn no_hits(&self, query_fasta: &Path) -> Result<BTreeSet<String>> {
        Ok(no_hit_queries(fasta::query_ids(query_fasta)?, &self.hits))
    }
}

/// Set difference between all query ids and those with a hit.
pub fn no_hit_queries<I>(queries: I, hits: &[SeedHit]) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    let hit_queries: BTreeSet<&str> = hits.iter().map(|h| h.query.as_str()).collect();
    queries
        .into_iter()
        .filter(|q| !hit_queries.contains(q.as_str()))
        .collect()
}

fn log_stats(selection: &Selection) {
    let stats = &selection.stats;
    log::info!(
        "{} alignments read, {} kept",
        stats.total_processed,
        stats.kept
    );
    log::debug!(
        "rejected: identity {}, e-value {}, score {}, taxon {}; skipped: satisfied {}, overlap {}",
        stats.filtered_by_identity,
        stats.filtered_by_evalue,
        stats.filtered_by_score,
        stats.filtered_by_taxon,
        stats.skipped_satisfied,
        stats.skipped_overlap
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::Span;
    use std::path::PathBuf;

    fn hit(query: &str) -> SeedHit {
        SeedHit {
            query: query.to_string(),
            target: "t".to_string(),
            evalue: 1e-10,
            score: 100.0,
            query_span: Span::new(1, 10),
            subject_span: Span::new(1, 10),
        }
    }

    #[test]
    fn test_no_hit_complement() {
        let queries = ["A", "B", "C"].map(String::from);
        let hits = vec![hit("A"), hit("C")];
        let no_hits = no_hit_queries(queries, &hits);
        assert_eq!(no_hits.into_iter().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_no_hit_complement_uses_original_ids() {
        let queries = ["contig1", "contig2"].map(String::from);
        let hits = vec![hit("contig1"), hit("contig1")];
        let no_hits = no_hit_queries(queries, &hits);
        assert_eq!(no_hits.into_iter().collect::<Vec<_>>(), vec!["contig2"]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config::builder().num_threads(0).build();
        assert!(matches!(
            DiamondSearcher::new(config),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_tool_fails_before_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::builder()
            .diamond_binary(PathBuf::from("/nonexistent/diamond"))
            .temp_dir(dir.path().to_path_buf())
            .build();
        let searcher = DiamondSearcher::new(config).unwrap();

        let result = searcher.search(Path::new("in.fa"), &dir.path().join("out.tsv"));
        assert!(matches!(result, Err(SearchError::ToolUnavailable(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
