//! The resistance being approximated and how close a match must be.

use crate::error::{CalcError, Result};

/// A validated target resistance and tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpec {
    ohms: f64,
    tolerance: f64,
}

impl TargetSpec {
    /// Creates a target of `ohms` accepting any combination whose relative
    /// error is strictly below `tolerance` (a fraction, so 5% is `0.05`).
    pub fn new(ohms: f64, tolerance: f64) -> Result<Self> {
        if !ohms.is_finite() || ohms <= 0.0 {
            return Err(CalcError::invalid_target(format!(
                "{} is not a positive resistance",
                ohms
            )));
        }
        if !tolerance.is_finite() || tolerance <= 0.0 || tolerance > 1.0 {
            return Err(CalcError::degenerate(format!(
                "tolerance {} must be above 0 and at most 1",
                tolerance
            )));
        }
        Ok(TargetSpec { ohms, tolerance })
    }

    /// Parses the target from text such as `470`, `470R`, `10k`, `4k7` or `1M`.
    /// # Examples
    /// ```
    /// # use resistor_combo::TargetSpec;
    /// let target = TargetSpec::parse("4k7", 0.05).unwrap();
    /// assert_eq!(target.ohms(), 4700.0);
    /// ```
    pub fn parse(target: &str, tolerance: f64) -> Result<Self> {
        Self::new(parse_resistance(target)?, tolerance)
    }

    pub fn ohms(&self) -> f64 {
        self.ohms
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// `|equiv - target| / target`
    pub fn relative_error(&self, equiv: f64) -> f64 {
        (equiv - self.ohms).abs() / self.ohms
    }

    pub fn accepts(&self, equiv: f64) -> bool {
        self.relative_error(equiv) < self.tolerance
    }
}

/// Parses a resistance with an optional `R`, `k` or `M` unit letter, which may
/// also stand in for the decimal point as in `4k7`.
pub fn parse_resistance(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CalcError::invalid_target("no resistance given"));
    }

    let (number, multiplier) = match text.find(|c: char| c.is_ascii_alphabetic()) {
        None => (text.to_string(), 1.0),
        Some(pos) => {
            let (head, rest) = text.split_at(pos);
            let mut chars = rest.chars();
            let multiplier = match chars.next() {
                Some('R') | Some('r') => 1.0,
                Some('k') | Some('K') => 1e3,
                Some('M') => 1e6,
                _ => {
                    return Err(CalcError::invalid_target(format!(
                        "unknown unit in {:?}, expected R, k or M",
                        text
                    )))
                }
            };
            let tail = chars.as_str();
            if head.is_empty() {
                return Err(CalcError::invalid_target(format!(
                    "{:?} has no digits before the unit",
                    text
                )));
            }
            if tail.is_empty() {
                (head.to_string(), multiplier)
            } else if !head.contains('.') && tail.chars().all(|c| c.is_ascii_digit()) {
                (format!("{}.{}", head, tail), multiplier)
            } else {
                return Err(CalcError::invalid_target(format!(
                    "{:?} is not a resistance",
                    text
                )));
            }
        }
    };

    let value = number
        .parse::<f64>()
        .map_err(|_| CalcError::invalid_target(format!("{:?} is not a resistance", text)))?;
    let ohms = value * multiplier;
    if !ohms.is_finite() || ohms <= 0.0 {
        return Err(CalcError::invalid_target(format!(
            "{:?} is not a positive resistance",
            text
        )));
    }
    Ok(ohms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_suffixed() {
        assert_eq!(parse_resistance("470").unwrap(), 470.0);
        assert_eq!(parse_resistance(" 470 ").unwrap(), 470.0);
        assert_eq!(parse_resistance("470R").unwrap(), 470.0);
        assert_eq!(parse_resistance("10k").unwrap(), 10_000.0);
        assert_eq!(parse_resistance("10K").unwrap(), 10_000.0);
        assert_eq!(parse_resistance("1M").unwrap(), 1_000_000.0);
        assert_eq!(parse_resistance("2.2k").unwrap(), 2200.0);
        assert_eq!(parse_resistance("0.47").unwrap(), 0.47);
    }

    #[test]
    fn unit_as_decimal_point() {
        assert_eq!(parse_resistance("4k7").unwrap(), 4700.0);
        assert_eq!(parse_resistance("2M2").unwrap(), 2_200_000.0);
        assert_eq!(parse_resistance("4R7").unwrap(), 4.7);
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "   ", "abc", "10x", "k7", "1.5k7", "4k7k", "10m", "0", "-5", "0k"] {
            match parse_resistance(text) {
                Err(CalcError::InvalidTarget(_)) => {}
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn validates_tolerance() {
        assert!(TargetSpec::new(1000.0, 0.05).is_ok());
        assert!(TargetSpec::new(1000.0, 1.0).is_ok());
        for tol in [0.0, -0.1, 1.5, f64::NAN] {
            match TargetSpec::new(1000.0, tol) {
                Err(CalcError::DegenerateInput(_)) => {}
                other => panic!("tolerance {} gave {:?}", tol, other),
            }
        }
    }

    #[test]
    fn validates_target() {
        for ohms in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            match TargetSpec::new(ohms, 0.05) {
                Err(CalcError::InvalidTarget(_)) => {}
                other => panic!("target {} gave {:?}", ohms, other),
            }
        }
    }

    #[test]
    fn error_is_strict() {
        let target = TargetSpec::new(100.0, 0.1).unwrap();
        assert_eq!(target.relative_error(90.0), 0.1);
        assert!(!target.accepts(90.0));
        assert!(target.accepts(90.5));
        assert!(target.accepts(100.0));
    }
}
