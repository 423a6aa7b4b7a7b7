// src/period.rs

use crate::error::FormatError;
use std::{fmt, str::FromStr};

/// A reporting month, parsed from the fixed `YYYY/MM` label form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if year > 9999 || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// The following calendar month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl FromStr for Period {
    type Err = FormatError;

    /// Strict parse: exactly four digits, a slash, two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FormatError::BadPeriod(s.to_string());
        let b = s.as_bytes();
        if b.len() != 7 || b[4] != b'/' {
            return Err(bad());
        }
        if !b[..4].iter().chain(&b[5..]).all(u8::is_ascii_digit) {
            return Err(bad());
        }
        let year: u16 = s[0..4].parse().map_err(|_| bad())?;
        let month: u8 = s[5..7].parse().map_err(|_| bad())?;
        Period::new(year, month).ok_or_else(bad)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

/// Periods guaranteed to be strictly increasing.
///
/// The only way to get one is through [`PeriodSeq::new`] or
/// [`PeriodSeq::parse`], so holders never re-check ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodSeq(Vec<Period>);

impl PeriodSeq {
    pub fn new(periods: Vec<Period>) -> Result<Self, FormatError> {
        if let Some(w) = periods.windows(2).find(|w| w[0] >= w[1]) {
            return Err(FormatError::NonIncreasingPeriods {
                prev: w[0].to_string(),
                next: w[1].to_string(),
            });
        }
        Ok(Self(periods))
    }

    /// Parse header labels into a validated sequence.
    pub fn parse<S: AsRef<str>>(labels: &[S]) -> Result<Self, FormatError> {
        let periods = labels
            .iter()
            .map(|l| l.as_ref().parse())
            .collect::<Result<Vec<Period>, _>>()?;
        Self::new(periods)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Period> {
        self.0.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Period] {
        &self.0
    }

    /// True when every period is exactly one month after its predecessor.
    pub fn is_dense(&self) -> bool {
        self.0.windows(2).all(|w| w[0].next() == w[1])
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(Period::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let p: Period = "2001/12".parse().unwrap();
        assert_eq!((p.year(), p.month()), (2001, 12));
        assert_eq!(p.to_string(), "2001/12");
    }

    #[test]
    fn test_rejects_loose_labels() {
        for bad in ["2001/13", "2001/00", "2001-12", "01/12", "2001/1", " 2001/12", "abcd/ef"] {
            assert_eq!(
                bad.parse::<Period>(),
                Err(FormatError::BadPeriod(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_next_rolls_over_year() {
        let p: Period = "2001/12".parse().unwrap();
        assert_eq!(p.next().to_string(), "2002/01");
        assert_eq!(p.next().next().to_string(), "2002/02");
    }

    #[test]
    fn test_seq_requires_strict_increase() {
        assert!(PeriodSeq::parse(&["2001/12", "2002/03", "2002/06"]).is_ok());
        assert_eq!(
            PeriodSeq::parse(&["2002/03", "2002/03"]),
            Err(FormatError::NonIncreasingPeriods {
                prev: "2002/03".into(),
                next: "2002/03".into()
            })
        );
        assert!(PeriodSeq::parse(&["2002/03", "2001/12"]).is_err());
    }

    #[test]
    fn test_dense() {
        assert!(PeriodSeq::parse(&["2001/11", "2001/12", "2002/01"])
            .unwrap()
            .is_dense());
        assert!(!PeriodSeq::parse(&["2001/12", "2002/03"]).unwrap().is_dense());
    }
}
