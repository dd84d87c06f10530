//! Ordering, selection and rendering of search results.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use strum::{Display, EnumIter, EnumString};

use crate::colour::ColourBands;
use crate::error::{CalcError, Result};
use crate::format::{format_error, format_ohms};
use crate::search::{Evaluated, Found, Mode, RSet};

/// Primary ordering of ranked results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum SortKey {
    /// Smallest error first, fewer resistors breaking ties.
    #[default]
    #[strum(serialize = "error")]
    ByError,
    /// Fewest resistors first, smallest error breaking ties.
    #[strum(serialize = "size")]
    BySize,
}

impl SortKey {
    fn compare(self, a: &Evaluated, b: &Evaluated) -> Ordering {
        let by_error = a.error.total_cmp(&b.error);
        let by_size = a.set.len().cmp(&b.set.len());
        let primary = match self {
            SortKey::ByError => by_error.then(by_size),
            SortKey::BySize => by_size.then(by_error),
        };
        primary.then_with(|| a.set.total_cmp(&b.set))
    }
}

/// A selected combination along with everything needed to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub set: RSet,
    pub equiv: f64,
    pub error: f64,
    /// Formatted value of each resistor.
    pub labels: Vec<String>,
    /// Colour bands of each resistor.
    pub bands: Vec<ColourBands>,
    /// Labels joined by the connection symbol, e.g. `1.0kΩ || 2.2kΩ`.
    pub description: String,
    /// Formatted equivalent resistance.
    pub net: String,
    /// Percentage error, or `Exact match`.
    pub error_text: String,
}

impl RankedResult {
    fn render(hit: Evaluated, mode: Mode) -> Result<Self> {
        let labels = hit.set.values().iter().map(|v| format_ohms(*v)).collect::<Vec<_>>();
        let bands = hit
            .set
            .values()
            .iter()
            .map(|v| ColourBands::encode(*v))
            .collect::<Result<Vec<_>>>()?;
        Ok(RankedResult {
            description: labels.join(mode.separator()),
            net: format_ohms(hit.equiv),
            error_text: format_error(hit.error),
            labels,
            bands,
            set: hit.set,
            equiv: hit.equiv,
            error: hit.error,
        })
    }
}

/// Ranked results of a search in one mode.
#[derive(Debug, Clone)]
pub struct RRes {
    mode: Mode,
    results: Vec<RankedResult>,
    best_error: Option<f64>,
    truncated: bool,
}

impl RRes {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Provides an iterator over the selected results, in ranked order.
    pub fn iter(&self) -> impl Iterator<Item = &RankedResult> {
        self.results.iter()
    }

    /// The first ranked result.
    pub fn best(&self) -> Option<&RankedResult> {
        self.results.first()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Smallest error among every combination that passed, whether selected
    /// or not.
    pub fn best_error(&self) -> Option<f64> {
        self.best_error
    }

    /// `best_error` formatted for display.
    pub fn summary(&self) -> Option<String> {
        self.best_error.map(format_error)
    }

    /// True when the search stopped on its budget.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for RRes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.summary() {
            None => return writeln!(f, "{} resistors: no combination found within tolerance", self.mode),
            Some(summary) => writeln!(f, "{} resistors (closest error: {}):", self.mode, summary)?,
        }
        for (idx, res) in self.results.iter().enumerate() {
            writeln!(
                f,
                "{:>4}. {}  [{}]  = {}  ({})",
                idx + 1,
                res.description,
                res.bands.iter().join(", "),
                res.net,
                res.error_text
            )?;
        }
        if self.truncated {
            writeln!(f, "      (search budget exhausted, results may be incomplete)")?;
        }
        Ok(())
    }
}

/// Sorts the passing combinations of `found` by `sort_key` and renders the
/// first `top_n` of them.
pub fn rank(found: Found, sort_key: SortKey, top_n: usize) -> Result<RRes> {
    if top_n < 1 {
        return Err(CalcError::degenerate("at least one result must be requested"));
    }

    let Found {
        mode,
        hits,
        truncated,
        ..
    } = found;
    let best_error = hits.iter().map(|h| h.error).min_by(f64::total_cmp);

    let results = hits
        .into_iter()
        .sorted_by(|a, b| sort_key.compare(a, b))
        .take(top_n)
        .map(|hit| RankedResult::render(hit, mode))
        .collect::<Result<Vec<_>>>()?;

    Ok(RRes {
        mode,
        results,
        best_error,
        truncated,
    })
}
