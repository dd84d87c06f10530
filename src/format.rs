//! Human readable rendering of resistances and errors.

/// Formats a resistance with an Ω, kΩ or MΩ unit.
///
/// The unit is picked from the number of decimal digits in the integer part
/// of `value`, not from its order of magnitude: 4 to 6 digits print as kΩ, 7
/// or more as MΩ. The fractional part of `value` is dropped.
///
/// # Examples
/// ```
/// # use resistor_combo::format_ohms;
/// assert_eq!(format_ohms(470.0), "470Ω");
/// assert_eq!(format_ohms(4700.0), "4.7kΩ");
/// assert_eq!(format_ohms(2_200_000.0), "2.2MΩ");
/// ```
pub fn format_ohms(value: f64) -> String {
    let ohms = value.trunc() as u64;
    match digit_count(ohms) {
        0..=3 => format!("{}Ω", ohms),
        4..=6 => format!("{:?}kΩ", ohms as f64 / 1e3),
        _ => format!("{:?}MΩ", ohms as f64 / 1e6),
    }
}

/// Formats a relative error as a percentage with two decimals, or as
/// `Exact match` when the error is exactly zero.
pub fn format_error(error: f64) -> String {
    if error == 0.0 {
        "Exact match".to_string()
    } else {
        format!("{:.2}%", error * 100.0)
    }
}

fn digit_count(n: u64) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}
