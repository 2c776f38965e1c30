//! Closed-interval overlap test used to keep gene calls apart.

use std::fmt;

/// Inclusive coordinate range `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    /// Builds a span from two endpoints given in either order.
    pub fn new(a: u64, b: u64) -> Self {
        Span {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        overlaps(self, other)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Two closed intervals overlap iff `max(s1, s2) <= min(e1, e2)`.
///
/// A shared endpoint counts as overlap: `[1,10]` and `[10,20]` overlap,
/// `[1,10]` and `[11,20]` do not.
pub fn overlaps(a: &Span, b: &Span) -> bool {
    a.start.max(b.start) <= a.end.min(b.end)
}

/// Returns true if `span` overlaps any of `accepted`.
pub fn overlaps_any<'a, I>(span: &Span, accepted: I) -> bool
where
    I: IntoIterator<Item = &'a Span>,
{
    accepted.into_iter().any(|other| overlaps(span, other))
}
