//! Signed fixed-point decimals with 18 fractional digits.
//!
//! Placements are parsed into this representation exactly, so every later
//! step (rotation, translation, bounding boxes) runs on integers.

use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use crate::error::FixedError;

/// Number of fractional decimal digits carried by [`Fixed`].
pub const FRAC_DIGITS: u32 = 18;

/// Scale factor between a [`Fixed`] value and its raw integer.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// Largest accepted magnitude, in whole units.
pub const MAX_UNITS: i128 = 1_000_000_000;

const MAX_RAW: i128 = MAX_UNITS * SCALE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i128);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    /// Raw integer, i.e. the value multiplied by [`SCALE`].
    pub fn raw(self) -> i128 {
        self.0
    }

    /// Lossy conversion, for logging and floating-point generators only.
    pub fn to_f64(self) -> f64 {
        let whole = (self.0 / SCALE) as f64;
        let frac = (self.0 % SCALE) as f64 / SCALE as f64;
        whole + frac
    }

    /// Reduce an angle in degrees into `[0, 360)`.
    pub fn rem_degrees(self) -> Fixed {
        Fixed(self.0.rem_euclid(360 * SCALE))
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FixedError::Parse(s.to_string());
        let t = s.trim();
        let (negative, unsigned) = match t.as_bytes().first() {
            Some(b'-') => (true, &t[1..]),
            Some(b'+') => (false, &t[1..]),
            _ => (false, t),
        };
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(idx) => {
                let exp: i64 = unsigned[idx + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..idx], exp)
            }
            None => (unsigned, 0),
        };
        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let mut digits: Vec<u8> = Vec::with_capacity(int_part.len() + frac_part.len());
        for c in int_part.bytes().chain(frac_part.bytes()) {
            if !c.is_ascii_digit() {
                return Err(invalid());
            }
            digits.push(c - b'0');
        }
        let first_nonzero = digits.iter().position(|&d| d != 0).unwrap_or(digits.len());
        let digits = &digits[first_nonzero..];
        if digits.is_empty() {
            return Ok(Fixed::ZERO);
        }

        // value = digits * 10^shift, in raw units
        let shift = exponent
            .saturating_sub(frac_part.len() as i64)
            .saturating_add(FRAC_DIGITS as i64);
        let out_of_range = || FixedError::OutOfRange(s.to_string());
        let magnitude = if shift >= 0 {
            if (digits.len() as i64).saturating_add(shift) > 39 {
                return Err(out_of_range());
            }
            let mut acc = accumulate(digits).ok_or_else(out_of_range)?;
            for _ in 0..shift {
                acc = acc.checked_mul(10).ok_or_else(out_of_range)?;
            }
            acc
        } else {
            let drop = shift.unsigned_abs() as usize;
            if drop > digits.len() {
                0
            } else {
                let keep = digits.len() - drop;
                let kept = accumulate(&digits[..keep]).ok_or_else(out_of_range)?;
                // round half away from zero on the first dropped digit
                if drop > 0 && digits[keep] >= 5 {
                    kept + 1
                } else {
                    kept
                }
            }
        };
        let raw = if negative { -magnitude } else { magnitude };
        if raw.abs() > MAX_RAW {
            return Err(out_of_range());
        }
        Ok(Fixed(raw))
    }
}

fn accumulate(digits: &[u8]) -> Option<i128> {
    digits
        .iter()
        .try_fold(0i128, |acc, &d| acc.checked_mul(10)?.checked_add(d as i128))
}

impl TryFrom<f64> for Fixed {
    type Error = FixedError;

    /// Goes through the shortest decimal rendering of `f`, so `0.1` becomes exactly `0.1`.
    fn try_from(f: f64) -> Result<Self, Self::Error> {
        if !f.is_finite() {
            return Err(FixedError::NotFinite(f));
        }
        format!("{}", f).parse()
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u128;
        let whole = abs / scale;
        let frac = format!("{:018}", abs % scale);
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };
        write!(f, "{}{}.{}", sign, whole, frac)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

/// Integer division rounding half away from zero.
pub fn div_round(n: i128, d: i128) -> i128 {
    let q = n / d;
    let r = n % d;
    if 2 * r.abs() >= d.abs() {
        if (n < 0) != (d < 0) { q - 1 } else { q + 1 }
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    #[test]
    fn parse_plain() {
        assert_eq!(fx("0").raw(), 0);
        assert_eq!(fx("1").raw(), SCALE);
        assert_eq!(fx("-0.35").raw(), -350_000_000_000_000_000);
        assert_eq!(fx("+.5").raw(), SCALE / 2);
        assert_eq!(fx("2.").raw(), 2 * SCALE);
        assert_eq!(fx(" 0.0625 ").raw(), 62_500_000_000_000_000);
    }

    #[test]
    fn parse_exponent() {
        assert_eq!(fx("1e-3").raw(), 1_000_000_000_000_000);
        assert_eq!(fx("-2.5E2").raw(), -250 * SCALE);
        assert_eq!(fx("1e-18").raw(), 1);
        assert_eq!(fx("1e-40"), Fixed::ZERO);
    }

    #[test]
    fn parse_rounds_beyond_18_digits() {
        assert_eq!(fx("0.0000000000000000014").raw(), 1);
        assert_eq!(fx("0.0000000000000000015").raw(), 2);
        assert_eq!(fx("-0.0000000000000000015").raw(), -2);
        // long float expansions parse without overflow
        assert_eq!(fx("0.1000000000000000055511151231257827").raw(), SCALE / 10 + 6);
    }

    #[test]
    fn parse_rejects_garbage() {
        for s in ["", "-", ".", "1.2.3", "abc", "1e", "s1.0", "--1"] {
            assert!(s.parse::<Fixed>().is_err(), "{:?} should not parse", s);
        }
        assert!(matches!("1e10".parse::<Fixed>(), Err(FixedError::OutOfRange(_))));
        assert!(matches!("1e400".parse::<Fixed>(), Err(FixedError::OutOfRange(_))));
        // exponent saturates instead of overflowing
        assert!(matches!("1e9223372036854775807".parse::<Fixed>(), Err(FixedError::OutOfRange(_))));
        assert_eq!("1e-9223372036854775808".parse::<Fixed>().unwrap(), Fixed::ZERO);
    }

    #[test]
    fn from_f64_uses_shortest_repr() {
        assert_eq!(Fixed::try_from(0.1).unwrap(), fx("0.1"));
        assert_eq!(Fixed::try_from(-0.71 / 2.0).unwrap(), fx("-0.355"));
        assert!(Fixed::try_from(f64::NAN).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(fx("0").to_string(), "0.0");
        assert_eq!(fx("-1.5").to_string(), "-1.5");
        assert_eq!(fx("12.000000000000000001").to_string(), "12.000000000000000001");
        assert_eq!(fx("-0.25").to_string(), "-0.25");
    }

    #[test]
    fn rem_degrees_wraps() {
        assert_eq!(fx("-90").rem_degrees(), fx("270"));
        assert_eq!(fx("720.5").rem_degrees(), fx("0.5"));
    }

    #[test]
    fn rounding_division() {
        assert_eq!(div_round(7, 2), 4);
        assert_eq!(div_round(-7, 2), -4);
        assert_eq!(div_round(5, 3), 2);
        assert_eq!(div_round(-4, 3), -1);
    }
}
