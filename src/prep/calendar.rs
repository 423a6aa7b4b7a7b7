// src/prep/calendar.rs

use crate::{
    error::FormatError,
    period::{Period, PeriodSeq},
};

/// A gap-free monthly calendar over a source header, with the source column
/// that supplies each month.
///
/// Months missing from the source reuse the column of the latest source
/// period before them (forward fill).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Calendar {
    dates: PeriodSeq,
    columns: Vec<usize>,
}

impl Calendar {
    pub fn dense(source: &PeriodSeq) -> Result<Self, FormatError> {
        let mut dates: Vec<Period> = Vec::with_capacity(source.len());
        let mut columns: Vec<usize> = Vec::with_capacity(source.len());

        for (col, &label) in source.iter().enumerate() {
            let (last, last_col) = match (dates.last(), columns.last()) {
                (Some(&d), Some(&c)) => (d, c),
                _ => {
                    dates.push(label);
                    columns.push(col);
                    continue;
                }
            };

            let mut next = last.next();
            while next < label {
                dates.push(next);
                columns.push(last_col);
                next = next.next();
            }
            if next != label {
                return Err(FormatError::NonIncreasingPeriods {
                    prev: last.to_string(),
                    next: label.to_string(),
                });
            }
            dates.push(label);
            columns.push(col);
        }

        Ok(Self {
            dates: PeriodSeq::new(dates)?,
            columns,
        })
    }

    pub fn dates(&self) -> &PeriodSeq {
        &self.dates
    }

    /// Source value index (0-based, label excluded) for each calendar month.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal(labels: &[&str]) -> Calendar {
        Calendar::dense(&PeriodSeq::parse(labels).unwrap()).unwrap()
    }

    #[test]
    fn test_fills_quarter_gap_forward() {
        let c = cal(&["2001/12", "2002/03"]);
        assert_eq!(
            c.dates().labels(),
            vec!["2001/12", "2002/01", "2002/02", "2002/03"]
        );
        assert_eq!(c.columns(), &[0, 0, 0, 1]);
    }

    #[test]
    fn test_uneven_gaps_and_adjacent_months() {
        let c = cal(&["2001/11", "2001/12", "2002/06", "2002/07"]);
        assert_eq!(c.len(), 9);
        assert_eq!(c.columns(), &[0, 1, 1, 1, 1, 1, 1, 2, 3]);
        assert!(c.dates().is_dense());
        assert_eq!(c.dates().first().unwrap().to_string(), "2001/11");
    }

    #[test]
    fn test_single_and_empty_header() {
        let c = cal(&["2005/03"]);
        assert_eq!(c.columns(), &[0]);
        assert!(cal(&[]).is_empty());
    }
}
