//! Fixed-point quality values.
//!
//! q-values are stored as parts-per-thousand so that products compare
//! identically on every platform. Decimal text only appears when parsing a
//! header or formatting one.

use std::fmt;

/// A quality weight in the range `0..=1000` (i.e. `0.000..=1.000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quality(u16);

impl Quality {
    /// Scale of the fixed-point representation.
    pub const SCALE: u16 = 1000;
    /// `q=0`, not acceptable.
    pub const ZERO: Quality = Quality(0);
    /// `q=1`, most preferred.
    pub const MAX: Quality = Quality(Self::SCALE);

    /// Build from a per-mille value, saturating at `1000`.
    pub const fn from_millis(millis: u16) -> Self {
        if millis > Self::SCALE {
            Quality(Self::SCALE)
        } else {
            Quality(millis)
        }
    }

    /// Raw per-mille value.
    pub const fn millis(self) -> u16 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse the value of a `q=` parameter.
    ///
    /// At most three fractional digits are significant; extra digits are
    /// truncated. Values above one saturate to `1.000`; anything that is not
    /// a plain non-negative decimal number yields `0.000`.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let (int_part, frac_part) = match value.split_once('.') {
            Some((i, f)) => (i, f),
            None => (value, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Quality::ZERO;
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Quality::ZERO;
        }

        let int_is_zero = int_part.bytes().all(|b| b == b'0');
        if !int_is_zero {
            // Any integer part >= 1 saturates.
            return Quality::MAX;
        }

        let mut millis: u16 = 0;
        for (i, digit) in frac_part.bytes().take(3).enumerate() {
            let place = [100, 10, 1][i];
            millis += u16::from(digit - b'0') * place;
        }
        Quality(millis)
    }
}

impl fmt::Display for Quality {
    /// Formats with exactly three decimals, e.g. `0.900`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(Quality::parse("1"), Quality::MAX);
        assert_eq!(Quality::parse("1.0"), Quality::MAX);
        assert_eq!(Quality::parse("0.9").millis(), 900);
        assert_eq!(Quality::parse("0.25").millis(), 250);
        assert_eq!(Quality::parse(".5").millis(), 500);
        assert_eq!(Quality::parse("0.001").millis(), 1);
        assert_eq!(Quality::parse("0.0019").millis(), 1); // truncated
        assert_eq!(Quality::parse("0"), Quality::ZERO);
    }

    #[test]
    fn test_parse_malformed_clamps() {
        assert_eq!(Quality::parse("abc"), Quality::ZERO);
        assert_eq!(Quality::parse("-1"), Quality::ZERO);
        assert_eq!(Quality::parse(""), Quality::ZERO);
        assert_eq!(Quality::parse("0.x"), Quality::ZERO);
        assert_eq!(Quality::parse("20"), Quality::MAX);
    }

    #[test]
    fn test_display_three_decimals() {
        assert_eq!(Quality::MAX.to_string(), "1.000");
        assert_eq!(Quality::from_millis(900).to_string(), "0.900");
        assert_eq!(Quality::from_millis(1).to_string(), "0.001");
        assert_eq!(Quality::from_millis(5000), Quality::MAX);
    }
}
