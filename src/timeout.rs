//! Deadline support for seed ortholog searches
//!
//! A search blocks until the aligner exits. Callers that need a deadline can
//! use [`SearchTimeoutExt`]; the search keeps running on its worker thread
//! after the deadline and still removes its workspace when the aligner exits.

use crate::error::{Result, SearchError};
use crate::searcher::{DiamondSearcher, SearchOutcome};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Extension trait to add timeout support to a searcher
pub trait SearchTimeoutExt {
    /// Search with a deadline
    fn search_timeout(
        &self,
        query_fasta: &Path,
        seed_orthologs: &Path,
        timeout: Duration,
    ) -> Result<SearchOutcome>;
}

impl SearchTimeoutExt for DiamondSearcher {
    fn search_timeout(
        &self,
        query_fasta: &Path,
        seed_orthologs: &Path,
        timeout: Duration,
    ) -> Result<SearchOutcome> {
        let query_fasta = query_fasta.to_path_buf();
        let seed_orthologs = seed_orthologs.to_path_buf();
        let searcher = self.clone();

        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = searcher.search(&query_fasta, &seed_orthologs);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(SearchError::Timeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(SearchError::Other("Search thread crashed".to_string()))
            }
        }
    }
}
