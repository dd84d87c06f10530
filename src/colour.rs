//! Three band resistor colour codes.

use std::fmt;

use itertools::Itertools;
use strum::{Display, EnumIter};

use crate::error::{CalcError, Result};

/// A single colour band.
///
/// Black through white carry the digits 0 to 9. Gold and silver only appear
/// as multipliers, for ×0.1 and ×0.01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Colour {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
    White,
    Gold,
    Silver,
}

impl Colour {
    /// The colour carrying `digit`, where -1 and -2 are the gold and silver
    /// multipliers.
    pub fn from_digit(digit: i32) -> Option<Self> {
        use Colour::*;
        Some(match digit {
            -2 => Silver,
            -1 => Gold,
            0 => Black,
            1 => Brown,
            2 => Red,
            3 => Orange,
            4 => Yellow,
            5 => Green,
            6 => Blue,
            7 => Purple,
            8 => Gray,
            9 => White,
            _ => return None,
        })
    }

    pub fn digit(self) -> i32 {
        use Colour::*;
        match self {
            Silver => -2,
            Gold => -1,
            Black => 0,
            Brown => 1,
            Red => 2,
            Orange => 3,
            Yellow => 4,
            Green => 5,
            Blue => 6,
            Purple => 7,
            Gray => 8,
            White => 9,
        }
    }
}

/// The bands for two significant digits followed by a power of ten multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColourBands([Colour; 3]);

impl ColourBands {
    /// Encodes a resistance as three bands.
    ///
    /// The value is written in scientific notation, its mantissa digits become
    /// the significant digits (padded with a 0 when there is only one) and the
    /// exponent, less one, becomes the multiplier.
    /// # Examples
    /// ```
    /// # use resistor_combo::{Colour, ColourBands};
    /// let bands = ColourBands::encode(470.0).unwrap();
    /// assert_eq!(bands.colours(), [Colour::Yellow, Colour::Purple, Colour::Brown]);
    /// ```
    pub fn encode(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CalcError::NotEncodable(value));
        }

        let sci = format!("{:e}", value);
        let (mantissa, exponent) = sci
            .split_once('e')
            .ok_or_else(|| CalcError::internal(format!("no exponent in {:?}", sci)))?;
        let exponent: i32 = exponent
            .parse()
            .map_err(|_| CalcError::internal(format!("bad exponent in {:?}", sci)))?;
        let digits = mantissa
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as i32)
            .collect::<Vec<_>>();

        let (first, second) = match digits.as_slice() {
            [first] => (*first, 0),
            [first, second] => (*first, *second),
            _ => return Err(CalcError::NotEncodable(value)),
        };

        match (
            Colour::from_digit(first),
            Colour::from_digit(second),
            Colour::from_digit(exponent - 1),
        ) {
            (Some(a), Some(b), Some(m)) => Ok(ColourBands([a, b, m])),
            _ => Err(CalcError::NotEncodable(value)),
        }
    }

    pub fn colours(&self) -> [Colour; 3] {
        self.0
    }

    /// Reads the bands back as a resistance, `(d1 * 10 + d2) * 10^multiplier`.
    pub fn value(&self) -> f64 {
        let [a, b, m] = self.0;
        let significand = f64::from(a.digit() * 10 + b.digit());
        match m.digit() {
            exp if exp >= 0 => significand * 10f64.powi(exp),
            exp => significand / 10f64.powi(-exp),
        }
    }
}

impl fmt::Display for ColourBands {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
