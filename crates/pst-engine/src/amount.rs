//! Formatted-decimal money handling.
//!
//! The upstream feed renders currency columns as text with thousands
//! separators and two decimal places (e.g. `"1,234.50"`). Arithmetic is
//! done on integer cents so sums are exact; formatting reproduces the
//! feed's rendering byte for byte (round-trip property).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Cents scale (1e-2) used for all aggregated currency columns.
pub const CENTS_SCALE: i64 = 100;

/// A signed currency amount in integer cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cents(pub i64);

impl Cents {
    /// Parse a formatted decimal string (`"1,234.50"`, `"-17"`, `".50"`)
    /// into cents.
    ///
    /// Grouping commas are stripped before parsing. At most two fraction
    /// digits are accepted; a third would silently lose precision, so it
    /// is rejected instead. Returns `None` for anything that is not a
    /// signed decimal number.
    pub fn parse(raw: &str) -> Option<Cents> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let unsep = s.replace(',', "");
        let (whole_s, frac_s) = match unsep.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsep.as_str(), ""),
        };

        if whole_s.is_empty() && frac_s.is_empty() {
            return None;
        }
        if frac_s.len() > 2 {
            return None;
        }
        if !whole_s.chars().all(|c| c.is_ascii_digit())
            || !frac_s.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let whole: i64 = if whole_s.is_empty() {
            0
        } else {
            whole_s.parse().ok()?
        };

        // ".5" means 50 cents, ".50" means 50 cents.
        let frac: i64 = match frac_s.len() {
            0 => 0,
            1 => frac_s.parse::<i64>().ok()? * 10,
            _ => frac_s.parse().ok()?,
        };

        let magnitude = whole.checked_mul(CENTS_SCALE)?.checked_add(frac)?;
        Some(Cents(if negative { -magnitude } else { magnitude }))
    }

    /// Render as the feed's textual form: thousands commas, two decimals.
    pub fn format(&self) -> String {
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / CENTS_SCALE as u64;
        let frac = magnitude % CENTS_SCALE as u64;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{grouped}.{frac:02}")
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_decimal() {
        assert_eq!(Cents::parse("1,234.50"), Some(Cents(123_450)));
        assert_eq!(Cents::parse("100.00"), Some(Cents(10_000)));
        assert_eq!(Cents::parse("0.05"), Some(Cents(5)));
        assert_eq!(Cents::parse("12"), Some(Cents(1_200)));
        assert_eq!(Cents::parse(".50"), Some(Cents(50)));
        assert_eq!(Cents::parse("2,000,000.99"), Some(Cents(200_000_099)));
    }

    #[test]
    fn parses_negative() {
        assert_eq!(Cents::parse("-1,234.50"), Some(Cents(-123_450)));
        assert_eq!(Cents::parse("-0.01"), Some(Cents(-1)));
    }

    #[test]
    fn single_fraction_digit_scales_to_tens() {
        assert_eq!(Cents::parse("1234.5"), Some(Cents(123_450)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Cents::parse(""), None);
        assert_eq!(Cents::parse("   "), None);
        assert_eq!(Cents::parse("abc"), None);
        assert_eq!(Cents::parse("1.2.3"), None);
        assert_eq!(Cents::parse("1.234"), None); // three fraction digits
        assert_eq!(Cents::parse("."), None);
        assert_eq!(Cents::parse("-"), None);
    }

    #[test]
    fn format_reproduces_feed_rendering() {
        assert_eq!(Cents(123_450).format(), "1,234.50");
        assert_eq!(Cents(10_000).format(), "100.00");
        assert_eq!(Cents(5).format(), "0.05");
        assert_eq!(Cents(-123_450).format(), "-1,234.50");
        assert_eq!(Cents(200_000_099).format(), "2,000,000.99");
        assert_eq!(Cents(0).format(), "0.00");
    }

    #[test]
    fn parse_format_round_trip() {
        for raw in ["1,234.50", "0.00", "999.99", "-12,345,678.01", "1,000.00"] {
            let cents = Cents::parse(raw).unwrap();
            assert_eq!(cents.format(), raw);
        }
    }

    #[test]
    fn sums_are_exact() {
        // 0.1 + 0.2 is exactly 0.3 in cents; the float version is not.
        let mut total = Cents::default();
        total += Cents::parse("0.10").unwrap();
        total += Cents::parse("0.20").unwrap();
        assert_eq!(total, Cents(30));
        assert_eq!(total.format(), "0.30");
    }
}
