//! Type-safe competitor identifier.
//!
//! Competitors are identified by the integer bib number that appears in the
//! event log. Wrapping it in a newtype keeps it from being confused with
//! event kind codes, lap indices, or firing-line numbers.

use core::str::FromStr;

/// Bib number of a competitor, as written in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CompetitorId(pub u32);

impl CompetitorId {
    /// Return the inner bib number.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CompetitorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<CompetitorId> for u32 {
    fn from(id: CompetitorId) -> Self {
        id.0
    }
}

impl FromStr for CompetitorId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}
