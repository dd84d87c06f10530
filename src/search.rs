//! Enumeration of resistor multisets and their series/parallel equivalents.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::error::{CalcError, Result};
use crate::format::format_ohms;
use crate::target::TargetSpec;

/// How the resistors of a combination are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    Series,
    Parallel,
}

impl Mode {
    /// Equivalent resistance of `values` connected in this mode.
    pub fn equivalent(self, values: &[f64]) -> f64 {
        match (self, values) {
            (Mode::Series, _) => values.iter().sum(),
            (Mode::Parallel, [single]) => *single,
            (Mode::Parallel, _) => values.iter().map(|v| v.recip()).sum::<f64>().recip(),
        }
    }

    /// Separator used between values when describing a combination.
    pub fn separator(self) -> &'static str {
        match self {
            Mode::Series => " + ",
            Mode::Parallel => " || ",
        }
    }
}

/// A multiset of resistor values, held in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct RSet(Box<[f64]>);

impl RSet {
    pub fn new(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        RSet(values.into_boxed_slice())
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the sum of all the values in the set.
    pub fn sum(&self) -> f64 {
        Mode::Series.equivalent(&self.0)
    }

    /// Number of times `value` occurs in the set.
    pub fn count(&self, value: f64) -> usize {
        self.0.iter().filter(|&&v| v == value).count()
    }

    /// Lexicographic order over the sorted values.
    pub fn total_cmp(&self, other: &RSet) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.len().cmp(&other.len())
    }
}

impl fmt::Display for RSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = if f.alternate() { "\n" } else { ", " };
        write!(f, "{}", self.0.iter().map(|r| format_ohms(*r)).join(sep))
    }
}

/// Largest supported number of resistors in one combination.
pub const MAX_SIZE: usize = 8;

/// Bounds on the size of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest number of resistors in one combination.
    pub max_size: usize,
    /// Largest number of times one value may be used in a combination.
    pub multiplicity: usize,
    /// Stop after evaluating this many candidates.
    pub budget: Option<u64>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_size: 3,
            multiplicity: 3,
            budget: None,
        }
    }
}

impl Limits {
    pub fn validate(&self) -> Result<()> {
        if self.max_size < 1 {
            return Err(CalcError::degenerate("combinations need at least one resistor"));
        }
        if self.max_size > MAX_SIZE {
            return Err(CalcError::degenerate(format!(
                "combinations are limited to {} resistors, got {}",
                MAX_SIZE, self.max_size
            )));
        }
        if self.multiplicity < 1 {
            return Err(CalcError::degenerate("each value must be usable at least once"));
        }
        Ok(())
    }
}

/// A combination that passed the tolerance test.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub set: RSet,
    pub equiv: f64,
    pub error: f64,
}

/// The outcome of a single search.
#[derive(Debug, Clone)]
pub struct Found {
    pub mode: Mode,
    /// Passing combinations, in generation order.
    pub hits: Vec<Evaluated>,
    /// Number of candidate combinations evaluated.
    pub visited: u64,
    /// Set when the budget ran out before the enumeration finished.
    pub truncated: bool,
}

/// Finds every multiset of `universe` values, connected in `mode`, whose
/// equivalent resistance is within tolerance of `target`.
///
/// Each value may appear up to `limits.multiplicity` times and a combination
/// holds at most `limits.max_size` resistors. For series searches, values
/// above the target are left out of the universe.
pub fn search(universe: &[f64], mode: Mode, target: &TargetSpec, limits: &Limits) -> Result<Found> {
    limits.validate()?;

    let values = universe
        .iter()
        .cloned()
        .filter(|&v| v.is_finite() && v > 0.0)
        .filter(|&v| mode == Mode::Parallel || v <= target.ohms())
        .sorted_by(f64::total_cmp)
        .dedup()
        .collect::<Vec<f64>>();

    let mut walk = Walk {
        values: &values,
        mode,
        target,
        limits,
        indices: Vec::with_capacity(limits.max_size),
        picks: Vec::with_capacity(limits.max_size),
        hits: Vec::new(),
        visited: 0,
        truncated: false,
    };
    walk.descend(0)?;

    if walk.truncated {
        warn!(
            %mode,
            budget = limits.budget,
            hits = walk.hits.len(),
            "search budget exhausted, results are partial"
        );
    }
    debug!(
        %mode,
        eligible = values.len(),
        visited = walk.visited,
        hits = walk.hits.len(),
        "search finished"
    );

    Ok(Found {
        mode,
        hits: walk.hits,
        visited: walk.visited,
        truncated: walk.truncated,
    })
}

// Depth first walk over non-decreasing index sequences. Each index may repeat
// up to `multiplicity` times, so every multiset is generated exactly once in
// its sorted form.
struct Walk<'a> {
    values: &'a [f64],
    mode: Mode,
    target: &'a TargetSpec,
    limits: &'a Limits,
    indices: Vec<usize>,
    picks: Vec<f64>,
    hits: Vec<Evaluated>,
    visited: u64,
    truncated: bool,
}

impl<'a> Walk<'a> {
    fn exhausted(&self) -> bool {
        self.limits.budget.map_or(false, |b| self.visited >= b)
    }

    fn repeats(&self, idx: usize) -> usize {
        self.indices.iter().rev().take_while(|&&i| i == idx).count()
    }

    fn descend(&mut self, start: usize) -> Result<()> {
        for idx in start..self.values.len() {
            if self.truncated {
                return Ok(());
            }
            if self.repeats(idx) >= self.limits.multiplicity {
                continue;
            }
            if self.exhausted() {
                self.truncated = true;
                return Ok(());
            }

            self.indices.push(idx);
            self.picks.push(self.values[idx]);
            let cont = self.visit()?;
            if cont == Step::Deeper && self.picks.len() < self.limits.max_size {
                self.descend(idx)?;
            }
            self.indices.pop();
            self.picks.pop();

            if cont == Step::Stop {
                break;
            }
        }
        Ok(())
    }

    fn visit(&mut self) -> Result<Step> {
        let equiv = self.mode.equivalent(&self.picks);
        if !equiv.is_finite() {
            return Err(CalcError::internal(format!(
                "{} equivalent of {:?} is {}",
                self.mode, self.picks, equiv
            )));
        }
        self.visited += 1;

        let error = self.target.relative_error(equiv);
        if error < self.target.tolerance() {
            self.hits.push(Evaluated {
                set: RSet(self.picks.clone().into_boxed_slice()),
                equiv,
                error,
            });
            return Ok(Step::Deeper);
        }

        // Values ascend: a larger series sibling or any extension only adds
        // resistance, and extending a parallel group only removes it.
        Ok(match self.mode {
            Mode::Series if equiv > self.target.ohms() => Step::Stop,
            Mode::Parallel if equiv < self.target.ohms() => Step::Sideways,
            _ => Step::Deeper,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Deeper,
    Sideways,
    Stop,
}
