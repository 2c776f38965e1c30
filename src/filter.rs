//! Quality thresholds applied to every alignment record.

use crate::config::Config;
use crate::record::HitRecord;

/// Outcome of checking one record against the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    LowIdentity,
    HighEvalue,
    LowScore,
    ExcludedTaxon,
}

/// Identity, e-value, score and taxon thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Minimum percent identity
    pub min_pident: f64,
    /// Maximum e-value
    pub max_evalue: f64,
    /// Minimum bit score
    pub min_score: f64,
    /// Targets named `<taxon>.<anything>` are rejected
    pub excluded_taxon: Option<String>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            min_pident: 0.0,
            max_evalue: 0.001,
            min_score: 0.0,
            excluded_taxon: None,
        }
    }
}

impl From<&Config> for Thresholds {
    fn from(config: &Config) -> Self {
        Thresholds {
            min_pident: config.min_pident,
            max_evalue: config.max_evalue,
            min_score: config.min_score,
            excluded_taxon: config.excluded_taxon().map(str::to_string),
        }
    }
}

impl Thresholds {
    /// Checks a record, reporting the first failing predicate.
    pub fn check(&self, record: &HitRecord) -> Verdict {
        if record.pident < self.min_pident {
            Verdict::LowIdentity
        } else if record.evalue > self.max_evalue {
            Verdict::HighEvalue
        } else if record.bitscore < self.min_score {
            Verdict::LowScore
        } else if self.is_excluded_target(&record.target) {
            Verdict::ExcludedTaxon
        } else {
            Verdict::Accept
        }
    }

    pub fn accepts(&self, record: &HitRecord) -> bool {
        self.check(record) == Verdict::Accept
    }

    /// The taxon must be followed by a literal dot: `960` does not exclude `9606.X`.
    pub fn is_excluded_target(&self, target: &str) -> bool {
        match &self.excluded_taxon {
            Some(taxon) => target
                .strip_prefix(taxon.as_str())
                .is_some_and(|rest| rest.starts_with('.')),
            None => false,
        }
    }
}

/// Counters collected while selecting hits.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterStats {
    pub total_processed: usize,
    pub kept: usize,
    pub filtered_by_identity: usize,
    pub filtered_by_evalue: usize,
    pub filtered_by_score: usize,
    pub filtered_by_taxon: usize,
    pub skipped_satisfied: usize,
    pub skipped_overlap: usize,
}

impl FilterStats {
    pub(crate) fn record_verdict(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accept => {}
            Verdict::LowIdentity => self.filtered_by_identity += 1,
            Verdict::HighEvalue => self.filtered_by_evalue += 1,
            Verdict::LowScore => self.filtered_by_score += 1,
            Verdict::ExcludedTaxon => self.filtered_by_taxon += 1,
        }
    }
}
