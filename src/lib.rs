//! A resistor combination finder for circuit design.
//!
//! Given a target resistance and a tolerance, it searches the standard resistor values for small
//! groups of resistors that, wired in series or in parallel, land within tolerance of the target.
//! Matches are ranked by closeness or by how few parts they need, and every part is presented
//! with its colour bands.
//!
//! # Example
//! To build 1kΩ to within 5% from at most two E12 resistors:
//! ```rust
//! use resistor_combo::*;
//!
//! let target = TargetSpec::parse("1k", 0.05).expect("valid target");
//! let report = RCalc::e12()
//!     .max_size(2)
//!     .calc(&target, SortKey::ByError, 5)
//!     .expect("valid parameters");
//!
//! let best = report.series.best().expect("1k is a standard value");
//! assert_eq!(best.description, "1.0kΩ");
//! assert_eq!(best.error_text, "Exact match");
//!
//! println!("{}", report);
//! ```
//! Printing the report produces tables such as:
//! ```text
//! Parallel resistors (closest error: Exact match):
//!    1. 1.0kΩ  [brown black red]  = 1.0kΩ  (Exact match)
//!    2. 1.0kΩ || 8.2MΩ  [brown black red, gray red green]  = 999Ω  (0.01%)
//! ...
//! ```

use std::fmt;

use itertools::Itertools;
use lazy_static::lazy_static;
use strum::{Display, EnumIter, EnumString};
use tracing::info;

mod colour;
mod error;
mod format;
mod rank;
mod search;
mod target;

pub use colour::{Colour, ColourBands};
pub use error::{CalcError, Result};
pub use format::{format_error, format_ohms};
pub use rank::{rank, RRes, RankedResult, SortKey};
pub use search::{search, Evaluated, Found, Limits, Mode, RSet, MAX_SIZE};
pub use target::{parse_resistance, TargetSpec};

/// Number of decades generated for the standard families, 10Ω up to 8.2MΩ for E12.
pub const DEFAULT_DECADES: u32 = 6;

/// Largest supported number of decades.
pub const MAX_DECADES: u32 = 9;

const E3_BASES: &[u32] = &[10, 22, 47];
const E6_BASES: &[u32] = &[15, 33, 68];
const E12_BASES: &[u32] = &[12, 18, 27, 39, 56, 82];
const E24_BASES: &[u32] = &[11, 13, 16, 20, 24, 30, 36, 43, 51, 62, 75, 91];

lazy_static! {
    /// RSeries constant for the E3 standard series
    pub static ref E3: RSeries = RSeries::from_bases(E3_BASES, DEFAULT_DECADES);
    /// RSeries constant for the E6 standard series
    pub static ref E6: RSeries = RSeries::extend(&E3, E6_BASES);
    /// RSeries constant for the E12 standard series
    pub static ref E12: RSeries = RSeries::extend(&E6, E12_BASES);
    /// RSeries constant for the E24 standard series
    pub static ref E24: RSeries = RSeries::extend(&E12, E24_BASES);
}

/// A table of standard resistor values, sorted ascending without duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct RSeries {
    values: Box<[f64]>,
    decades: u32,
}

impl RSeries {
    /// Defines a new series of resistor values. Only the two digit bases need to be provided,
    /// they are multiplied by 1, 10, 100, ... for `decades` decades (at most `MAX_DECADES`).
    ///
    /// Bases outside 10..=99 would give values that cannot be written as colour bands, so they
    /// are rejected along with an empty base list.
    /// # Example
    /// ```
    ///     # use resistor_combo::*;
    ///     let e3 = RSeries::new(&[10, 22, 47], 2).unwrap();
    ///     assert_eq!(e3.values(), &[10.0, 22.0, 47.0, 100.0, 220.0, 470.0]);
    ///     assert!(RSeries::new(&[105], 1).is_err());
    /// ```
    pub fn new(bases: &[u32], decades: u32) -> Result<Self> {
        if bases.is_empty() {
            return Err(CalcError::degenerate("a series needs at least one base value"));
        }
        if let Some(base) = bases.iter().find(|b| !(10..=99).contains(*b)) {
            return Err(CalcError::degenerate(format!(
                "base values must have two digits, got {}",
                base
            )));
        }
        if !(1..=MAX_DECADES).contains(&decades) {
            return Err(CalcError::degenerate(format!(
                "decades must be between 1 and {}, got {}",
                MAX_DECADES, decades
            )));
        }
        Ok(Self::from_bases(bases, decades))
    }

    fn from_bases(bases: &[u32], decades: u32) -> Self {
        RSeries {
            values: Self::scale(bases, decades)
                .sorted_by(f64::total_cmp)
                .dedup()
                .collect::<Vec<f64>>()
                .into_boxed_slice(),
            decades,
        }
    }

    fn extend(base: &RSeries, add: &[u32]) -> Self {
        RSeries {
            values: base
                .iter()
                .cloned()
                .chain(Self::scale(add, base.decades))
                .sorted_by(f64::total_cmp)
                .dedup()
                .collect::<Vec<f64>>()
                .into_boxed_slice(),
            decades: base.decades,
        }
    }

    fn scale(bases: &[u32], decades: u32) -> impl Iterator<Item = f64> + '_ {
        (0..decades)
            .cartesian_product(bases.iter())
            .map(|(pow, base)| (u64::from(*base) * 10u64.pow(pow)) as f64)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn decades(&self) -> u32 {
        self.decades
    }
}

/// The standard E series that can be written with two significant digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Family {
    E3,
    E6,
    #[default]
    E12,
    E24,
}

impl Family {
    /// Every base value in the family.
    pub fn bases(self) -> Vec<u32> {
        let parts: &[&[u32]] = match self {
            Family::E3 => &[E3_BASES],
            Family::E6 => &[E3_BASES, E6_BASES],
            Family::E12 => &[E3_BASES, E6_BASES, E12_BASES],
            Family::E24 => &[E3_BASES, E6_BASES, E12_BASES, E24_BASES],
        };
        parts.iter().flat_map(|p| p.iter().cloned()).sorted().collect()
    }

    /// Builds the family's table over `decades` decades.
    pub fn series(self, decades: u32) -> Result<RSeries> {
        RSeries::new(&self.bases(), decades)
    }
}

/// Both ranked lists of a calculation.
#[derive(Debug, Clone)]
pub struct Report {
    pub series: RRes,
    pub parallel: RRes,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n{}", self.parallel, self.series)
    }
}

/// Main calculator struct
#[derive(Debug, Clone)]
pub struct RCalc<'a> {
    rs: &'a RSeries,
    limits: Limits,
}

impl<'a> RCalc<'a> {
    /// Creates a new RCalc drawing values from `rs`, with up to three resistors per combination
    /// and each value usable up to three times.
    pub fn new(rs: &'a RSeries) -> Self {
        RCalc {
            rs,
            limits: Limits::default(),
        }
    }

    /// Creates a new RCalc drawing values from the E12 series.
    pub fn e12() -> RCalc<'static> {
        RCalc::new(&E12)
    }

    /// Sets the largest number of resistors in a combination.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.limits.max_size = max_size;
        self
    }

    /// Sets how many times a single value may be used in a combination.
    pub fn multiplicity(mut self, multiplicity: usize) -> Self {
        self.limits.multiplicity = multiplicity;
        self
    }

    /// Stops each search after `budget` candidate evaluations.
    pub fn budget(mut self, budget: u64) -> Self {
        self.limits.budget = Some(budget);
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the number of index combinations over the table with every value repeated
    /// `multiplicity` times, for every size up to `max_size`. This is the worst case amount of
    /// work for a search, pruning usually does far less.
    pub fn combinations(&self) -> u128 {
        let slots = (self.rs.len() as u128) * (self.limits.multiplicity as u128);
        // Sizes beyond the slot count contribute nothing.
        (1..=(self.limits.max_size as u128).min(slots))
            .map(|k| binomial(slots, k))
            .fold(0u128, u128::saturating_add)
    }

    /// Runs a single search in `mode`, without ranking.
    pub fn search(&self, mode: Mode, target: &TargetSpec) -> Result<Found> {
        search(self.rs.values(), mode, target, &self.limits)
    }

    /// Searches both series and parallel combinations for `target` and ranks each list,
    /// keeping the best `top_n` of each.
    pub fn calc(&self, target: &TargetSpec, sort_key: SortKey, top_n: usize) -> Result<Report> {
        self.limits.validate()?;
        if top_n < 1 {
            return Err(CalcError::degenerate("at least one result must be requested"));
        }

        let (series, parallel) = rayon::join(
            || rank(self.search(Mode::Series, target)?, sort_key, top_n),
            || rank(self.search(Mode::Parallel, target)?, sort_key, top_n),
        );
        let report = Report {
            series: series?,
            parallel: parallel?,
        };

        info!(
            ohms = target.ohms(),
            tolerance = target.tolerance(),
            series = report.series.len(),
            parallel = report.parallel.len(),
            "calculation finished"
        );
        Ok(report)
    }
}

fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    (0..k).fold(1u128, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e12_table() {
        assert_eq!(E12.len(), 72);
        assert_eq!(E12.values()[0], 10.0);
        assert_eq!(E12.values()[E12.len() - 1], 8_200_000.0);
        assert!(E12.values().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            &E12.values()[..12],
            &[10.0, 12.0, 15.0, 18.0, 22.0, 27.0, 33.0, 39.0, 47.0, 56.0, 68.0, 82.0]
        );
    }

    #[test]
    fn families_nest() {
        assert_eq!(E3.len(), 18);
        assert_eq!(E6.len(), 36);
        assert_eq!(E24.len(), 144);
        for family in [&*E3, &*E6, &*E12, &*E24] {
            assert!(family.values().windows(2).all(|w| w[0] < w[1]));
        }
        assert!(E3.iter().all(|v| E6.values().contains(v)));
        assert!(E12.iter().all(|v| E24.values().contains(v)));
    }

    #[test]
    fn family_series_matches_constants() {
        assert_eq!(Family::E12.series(DEFAULT_DECADES).unwrap(), *E12);
        assert_eq!(Family::E24.series(DEFAULT_DECADES).unwrap(), *E24);
        assert_eq!(Family::E12.bases().len(), 12);
        assert_eq!(Family::E3.series(1).unwrap().values(), &[10.0, 22.0, 47.0]);
    }

    #[test]
    fn family_decades_bounds() {
        assert!(Family::E12.series(0).is_err());
        assert!(Family::E12.series(MAX_DECADES + 1).is_err());
        let wide = Family::E12.series(MAX_DECADES).unwrap();
        assert_eq!(wide.values()[wide.len() - 1], 8.2e9);
    }

    #[test]
    fn family_parsing() {
        assert_eq!("e24".parse::<Family>().unwrap(), Family::E24);
        assert_eq!("E6".parse::<Family>().unwrap(), Family::E6);
        assert_eq!(Family::E12.to_string(), "e12");
        assert!("e96".parse::<Family>().is_err());
    }

    #[test]
    fn new_sorts_and_dedups() {
        let rs = RSeries::new(&[47, 10, 22, 10], 2).unwrap();
        assert_eq!(rs.values(), &[10.0, 22.0, 47.0, 100.0, 220.0, 470.0]);
    }

    #[test]
    fn new_rejects_unencodable_bases() {
        let cases: [(&[u32], u32); 5] = [
            (&[105], 1),
            (&[9], 1),
            (&[], 1),
            (&[10, 22], 0),
            (&[10], MAX_DECADES + 1),
        ];
        for (bases, decades) in cases {
            assert!(
                matches!(RSeries::new(bases, decades), Err(CalcError::DegenerateInput(_))),
                "{:?} over {} decades",
                bases,
                decades
            );
        }
        let rs = RSeries::new(&[68], 3).unwrap();
        let target = TargetSpec::new(6800.0, 0.05).unwrap();
        let report = RCalc::new(&rs).calc(&target, SortKey::ByError, 3).unwrap();
        assert_eq!(report.series.best().unwrap().description, "6.8kΩ");
    }

    #[test]
    fn combination_count() {
        let rs = RSeries::new(&[10, 22], 1).unwrap();
        let calc = RCalc::new(&rs).max_size(2).multiplicity(2);
        // 4 slots: C(4, 1) + C(4, 2)
        assert_eq!(calc.combinations(), 4 + 6);
        // every size past the 4 slots adds nothing, and the count returns at once
        assert_eq!(RCalc::new(&rs).max_size(usize::MAX).multiplicity(2).combinations(), 15);
        assert_eq!(RCalc::e12().max_size(1).multiplicity(3).combinations(), 216);
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(216, 3), 1_656_360);
        assert_eq!(binomial(2, 3), 0);
    }

    #[test]
    fn calc_validates() {
        let target = TargetSpec::new(1000.0, 0.05).unwrap();
        assert!(matches!(
            RCalc::e12().calc(&target, SortKey::ByError, 0),
            Err(CalcError::DegenerateInput(_))
        ));
        assert!(matches!(
            RCalc::e12().max_size(0).calc(&target, SortKey::ByError, 5),
            Err(CalcError::DegenerateInput(_))
        ));
        assert!(matches!(
            RCalc::e12().max_size(MAX_SIZE + 1).calc(&target, SortKey::ByError, 5),
            Err(CalcError::DegenerateInput(_))
        ));
    }

    #[test]
    fn calc_exact_match() {
        let target = TargetSpec::new(4700.0, 0.01).unwrap();
        let report = RCalc::e12().calc(&target, SortKey::ByError, 3).unwrap();
        for res in [&report.series, &report.parallel] {
            let best = res.best().unwrap();
            assert_eq!(best.set.values(), &[4700.0]);
            assert_eq!(best.error, 0.0);
            assert_eq!(res.summary().as_deref(), Some("Exact match"));
        }
        assert_eq!(report.series.mode(), Mode::Series);
        assert_eq!(report.parallel.mode(), Mode::Parallel);
    }
}
