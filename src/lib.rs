//! # diamond-seeds: seed ortholog search on top of DIAMOND
//!
//! This library runs the DIAMOND protein aligner on a query FASTA file and
//! turns its tabular output into a table of seed orthologs: the best
//! database hit(s) for every query, ready for orthology annotation.
//!
//! ## Overview
//!
//! - Proteins and CDS are searched with `blastp` / `blastx`; every query
//!   keeps its first hit that passes the identity, e-value, score and
//!   excluded-taxon thresholds.
//! - Genomes and metagenomic fragments are searched with `blastx` keeping
//!   every HSP; hits are then chosen greedily so that no two accepted hits
//!   overlap on the query, and each gets an id `<query>_<n>`.
//!
//! ## Example Usage
//!
//! ```no_run
//! # use anyhow::Result;
//! # fn main() -> Result<()> {
//! use diamond_seeds::{Config, DiamondSearcher, InputType};
//! use std::path::Path;
//!
//! let config = Config::builder()
//!     .input_type(InputType::Genome)
//!     .min_pident(40.0)
//!     .num_threads(8)
//!     .build();
//!
//! let searcher = DiamondSearcher::new(config)?;
//! let outcome = searcher.search(Path::new("assembly.fna"), Path::new("out.seed_orthologs"))?;
//!
//! println!("{} seed orthologs", outcome.hits().len());
//! for query in outcome.no_hits(Path::new("assembly.fna"))? {
//!     println!("no hit: {query}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - `record`: parsing of the aligner's 12-column tabular output
//! - `filter`: identity / e-value / score / taxon thresholds
//! - `overlap`: closed-interval overlap test
//! - `selector`: the two per-query selection strategies
//! - `emitter`: output table writer
//! - `runner`, `binary_finder`: building and running the aligner command
//! - `searcher`: the search lifecycle
//!
//! ## Thread Safety
//!
//! A [`DiamondSearcher`] keeps no state between searches and every search
//! uses its own temporary directory, so one searcher may be shared between
//! threads.

pub mod binary_finder;
pub mod config;
pub mod emitter;
pub mod error;
pub mod fasta;
pub mod filter;
pub mod overlap;
pub mod record;
pub mod runner;
pub mod searcher;
pub mod selector;
pub mod timeout;

pub use config::{Config, InputType, SensitivityMode};
pub use emitter::{Preamble, QueryNaming};
pub use error::{Result, SearchError};
pub use filter::{FilterStats, Thresholds};
pub use overlap::Span;
pub use record::HitRecord;
pub use searcher::{DiamondSearcher, SearchOutcome};
pub use selector::{SeedHit, Selection, SelectionStrategy};
pub use timeout::SearchTimeoutExt;
