//! Configuration options for seed ortholog searches.
//!
//! This module provides a builder pattern for configuring the aligner
//! invocation and the hit-selection thresholds applied to its output.

use crate::error::{Result, SearchError};
use crate::selector::SelectionStrategy;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// File name of the eggNOG protein database inside the data directory.
pub const DEFAULT_DB_NAME: &str = "eggnog_proteins.dmnd";

/// Environment variable pointing at the eggNOG data directory.
pub const DATA_DIR_ENV: &str = "EGGNOG_DATA_DIR";

/// Kind of sequences found in the query file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// Nucleotide coding sequences, translated by the aligner
    Cds,
    /// Protein sequences
    Proteins,
    /// Whole genome assemblies
    Genome,
    /// Metagenomic fragments
    Metagenome,
}

impl InputType {
    /// Aligner subcommand for this input type.
    pub fn tool(&self) -> &'static str {
        match self {
            InputType::Proteins => "blastp",
            InputType::Cds | InputType::Genome | InputType::Metagenome => "blastx",
        }
    }

    /// Whether hits are gene predictions on longer nucleotide sequences.
    pub fn predicts_genes(&self) -> bool {
        matches!(self, InputType::Genome | InputType::Metagenome)
    }

    /// Hit-selection strategy used for this input type.
    pub fn strategy(&self) -> SelectionStrategy {
        if self.predicts_genes() {
            SelectionStrategy::NonOverlappingSpans
        } else {
            SelectionStrategy::FirstHitPerQuery
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Cds => "CDS",
            InputType::Proteins => "proteins",
            InputType::Genome => "genome",
            InputType::Metagenome => "metagenome",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        [
            InputType::Cds,
            InputType::Proteins,
            InputType::Genome,
            InputType::Metagenome,
        ]
        .into_iter()
        .find(|itype| itype.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| SearchError::UnrecognizedInputType(s.to_string()))
    }
}

/// Aligner sensitivity presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityMode {
    Fast,
    MidSensitive,
    Sensitive,
    MoreSensitive,
    VerySensitive,
    UltraSensitive,
}

impl SensitivityMode {
    pub const ALL: [SensitivityMode; 6] = [
        SensitivityMode::Fast,
        SensitivityMode::MidSensitive,
        SensitivityMode::Sensitive,
        SensitivityMode::MoreSensitive,
        SensitivityMode::VerySensitive,
        SensitivityMode::UltraSensitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityMode::Fast => "fast",
            SensitivityMode::MidSensitive => "mid-sensitive",
            SensitivityMode::Sensitive => "sensitive",
            SensitivityMode::MoreSensitive => "more-sensitive",
            SensitivityMode::VerySensitive => "very-sensitive",
            SensitivityMode::UltraSensitive => "ultra-sensitive",
        }
    }

    /// Command-line flag for this mode. The aligner runs in fast mode when
    /// no flag is given, so `Fast` has none.
    pub fn flag(&self) -> Option<String> {
        match self {
            SensitivityMode::Fast => None,
            other => Some(format!("--{}", other.as_str())),
        }
    }
}

impl fmt::Display for SensitivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensitivityMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        SensitivityMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| SearchError::InvalidConfig(format!("unknown sensitivity mode {s}")))
    }
}

/// Configuration for a seed ortholog search.
///
/// # Default Values
/// - `input_type`: proteins
/// - `database`: `$EGGNOG_DATA_DIR/eggnog_proteins.dmnd` (or `data/` when unset)
/// - `num_threads`: Number of CPU cores
/// - `sensitivity`: sensitive
/// - `query_cover` / `subject_cover`: 0
/// - `min_pident`: 0, `max_evalue`: 0.001, `min_score`: 0
/// - `no_file_comments`: false
#[derive(Debug, Clone)]
pub struct Config {
    /// Kind of sequences in the query file
    pub input_type: InputType,

    /// Path to the DIAMOND database
    pub database: PathBuf,

    /// Threads handed to the aligner
    pub num_threads: usize,

    /// Aligner sensitivity preset
    pub sensitivity: SensitivityMode,

    /// Minimum query coverage percentage reported by the aligner
    pub query_cover: f64,

    /// Minimum subject coverage percentage reported by the aligner
    pub subject_cover: f64,

    /// Scoring matrix name
    pub matrix: Option<String>,

    /// Gap open penalty
    pub gap_open: Option<i32>,

    /// Gap extension penalty
    pub gap_extend: Option<i32>,

    /// Minimum percent identity of an accepted hit
    pub min_pident: f64,

    /// Maximum e-value of an accepted hit, also passed to the aligner
    pub max_evalue: f64,

    /// Minimum bit score of an accepted hit
    pub min_score: f64,

    /// Taxon id whose targets (`<taxon>.<gene>`) are discarded
    pub excluded_taxon: Option<String>,

    /// Parent directory for the per-search workspace
    pub temp_dir: Option<PathBuf>,

    /// Omit the comment preamble from the output table
    pub no_file_comments: bool,

    /// Explicit path to the aligner executable
    pub diamond_binary: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_type: InputType::Proteins,
            database: default_database(),
            num_threads: num_cpus::get().max(1),
            sensitivity: SensitivityMode::Sensitive,
            query_cover: 0.0,
            subject_cover: 0.0,
            matrix: None,
            gap_open: None,
            gap_extend: None,
            min_pident: 0.0,
            max_evalue: 0.001,
            min_score: 0.0,
            excluded_taxon: None,
            temp_dir: None,
            no_file_comments: false,
            diamond_binary: None,
        }
    }
}

/// Location of the eggNOG DIAMOND database when none is configured.
pub fn default_database() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
        .join(DEFAULT_DB_NAME)
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Example
    /// ```
    /// use diamond_seeds::{Config, InputType};
    ///
    /// let config = Config::builder()
    ///     .input_type(InputType::Genome)
    ///     .min_pident(40.0)
    ///     .num_threads(4)
    ///     .build();
    /// ```
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Checks value ranges the aligner would otherwise reject late.
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(SearchError::InvalidConfig(
                "number of threads must be positive".to_string(),
            ));
        }
        if self.max_evalue.is_nan() || self.max_evalue < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "e-value threshold must be non-negative, got {}",
                self.max_evalue
            )));
        }
        for (name, cover) in [
            ("query cover", self.query_cover),
            ("subject cover", self.subject_cover),
        ] {
            if !(0.0..=100.0).contains(&cover) {
                return Err(SearchError::InvalidConfig(format!(
                    "{name} must be between 0 and 100, got {cover}"
                )));
            }
        }
        Ok(())
    }

    /// Excluded taxon, with an empty value meaning none.
    pub fn excluded_taxon(&self) -> Option<&str> {
        self.excluded_taxon.as_deref().filter(|taxon| !taxon.is_empty())
    }
}

/// Builder for constructing Config instances.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the kind of sequences in the query file.
    ///
    /// Default: proteins
    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.config.input_type = input_type;
        self
    }

    /// Sets the DIAMOND database path.
    pub fn database(mut self, path: PathBuf) -> Self {
        self.config.database = path;
        self
    }

    /// Sets the number of threads handed to the aligner.
    ///
    /// Default: Number of CPU cores
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Sets the aligner sensitivity preset.
    ///
    /// Default: sensitive
    pub fn sensitivity(mut self, mode: SensitivityMode) -> Self {
        self.config.sensitivity = mode;
        self
    }

    /// Sets the minimum query coverage percentage.
    pub fn query_cover(mut self, cover: f64) -> Self {
        self.config.query_cover = cover;
        self
    }

    /// Sets the minimum subject coverage percentage.
    pub fn subject_cover(mut self, cover: f64) -> Self {
        self.config.subject_cover = cover;
        self
    }

    /// Sets the scoring matrix.
    pub fn matrix(mut self, matrix: impl Into<String>) -> Self {
        self.config.matrix = Some(matrix.into());
        self
    }

    /// Sets the gap open penalty.
    pub fn gap_open(mut self, penalty: i32) -> Self {
        self.config.gap_open = Some(penalty);
        self
    }

    /// Sets the gap extension penalty.
    pub fn gap_extend(mut self, penalty: i32) -> Self {
        self.config.gap_extend = Some(penalty);
        self
    }

    /// Sets the minimum percent identity (0-100).
    ///
    /// Default: 0
    pub fn min_pident(mut self, pident: f64) -> Self {
        self.config.min_pident = pident;
        self
    }

    /// Sets the maximum e-value.
    ///
    /// Default: 0.001
    pub fn max_evalue(mut self, evalue: f64) -> Self {
        self.config.max_evalue = evalue;
        self
    }

    /// Sets the minimum bit score.
    ///
    /// Default: 0
    pub fn min_score(mut self, score: f64) -> Self {
        self.config.min_score = score;
        self
    }

    /// Discards targets belonging to the given taxon. An empty taxon clears it.
    pub fn excluded_taxon(mut self, taxon: impl Into<String>) -> Self {
        let taxon = taxon.into();
        self.config.excluded_taxon = (!taxon.is_empty()).then_some(taxon);
        self
    }

    /// Sets the parent directory of the per-search workspace.
    ///
    /// Default: System temp directory
    pub fn temp_dir(mut self, path: PathBuf) -> Self {
        self.config.temp_dir = Some(path);
        self
    }

    /// Omits the comment preamble from the output table.
    ///
    /// Default: false
    pub fn no_file_comments(mut self, suppress: bool) -> Self {
        self.config.no_file_comments = suppress;
        self
    }

    /// Uses the given aligner executable instead of searching for one.
    pub fn diamond_binary(mut self, path: PathBuf) -> Self {
        self.config.diamond_binary = Some(path);
        self
    }

    /// Builds the final Config instance.
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_parsing() {
        assert_eq!("CDS".parse::<InputType>().unwrap(), InputType::Cds);
        assert_eq!("proteins".parse::<InputType>().unwrap(), InputType::Proteins);
        assert_eq!("genome".parse::<InputType>().unwrap(), InputType::Genome);
        assert_eq!("metagenome".parse::<InputType>().unwrap(), InputType::Metagenome);

        match "rna".parse::<InputType>() {
            Err(SearchError::UnrecognizedInputType(value)) => assert_eq!(value, "rna"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_input_type_tools_and_strategies() {
        assert_eq!(InputType::Proteins.tool(), "blastp");
        assert_eq!(InputType::Cds.tool(), "blastx");
        assert_eq!(InputType::Metagenome.tool(), "blastx");

        assert_eq!(InputType::Cds.strategy(), SelectionStrategy::FirstHitPerQuery);
        assert_eq!(InputType::Genome.strategy(), SelectionStrategy::NonOverlappingSpans);
    }

    #[test]
    fn test_sensitivity_flags() {
        assert_eq!(SensitivityMode::Fast.flag(), None);
        assert_eq!(
            SensitivityMode::UltraSensitive.flag().as_deref(),
            Some("--ultra-sensitive")
        );
        for mode in SensitivityMode::ALL {
            assert_eq!(mode.as_str().parse::<SensitivityMode>().unwrap(), mode);
        }
        assert!("turbo".parse::<SensitivityMode>().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .input_type(InputType::Genome)
            .min_pident(40.0)
            .max_evalue(1e-5)
            .excluded_taxon("9606")
            .num_threads(4)
            .build();

        assert_eq!(config.input_type, InputType::Genome);
        assert_eq!(config.min_pident, 40.0);
        assert_eq!(config.max_evalue, 1e-5);
        assert_eq!(config.excluded_taxon.as_deref(), Some("9606"));
        assert_eq!(config.num_threads, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Config::builder().num_threads(0).build().validate().is_err());
        assert!(Config::builder().max_evalue(-1.0).build().validate().is_err());
        assert!(Config::builder().query_cover(120.0).build().validate().is_err());
    }

    #[test]
    fn test_empty_excluded_taxon_means_none() {
        let config = Config::builder().excluded_taxon("").build();
        assert_eq!(config.excluded_taxon, None);
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.excluded_taxon = Some(String::new());
        assert!(config.validate().is_ok());
        assert_eq!(config.excluded_taxon(), None);

        config.excluded_taxon = Some("9606".to_string());
        assert_eq!(config.excluded_taxon(), Some("9606"));
    }
}
