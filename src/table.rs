// src/table.rs
//
// Pipe-delimited wide files: one header row of periods, one row per line item.

use crate::{error::FormatError, output::write_atomic, period::PeriodSeq};
use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::{io::Read, path::Path};

pub const DELIMITER: u8 = b'|';
pub const DATE_HEADER: &str = "quarter end date";

/// Read every record of a delimited file as raw fields, without quoting
/// rules and without requiring a uniform width.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("parse error at record {}", idx))?;
        out.push(record.iter().map(str::to_string).collect());
    }
    Ok(out)
}

pub fn read_records_from_path(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {:?}", path))?;
    read_records(file).with_context(|| format!("reading {:?}", path))
}

/// Serialize records as `\n`-terminated pipe-delimited lines.
pub fn render_records<I, R, S>(records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut wtr = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        wtr.write_record(record)?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("flushing records: {}", e.error()))
}

pub fn write_records<I, R, S>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let bytes = render_records(records)?;
    write_atomic(path, &bytes)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub label: String,
    pub values: Vec<String>,
}

/// A validated wide table: strictly increasing periods, and every row as wide
/// as the header.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub label: String,
    pub periods: PeriodSeq,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn from_records(records: Vec<Vec<String>>) -> Result<Self, FormatError> {
        let mut iter = records.into_iter();
        let mut header = iter.next().ok_or(FormatError::Empty)?.into_iter();
        let label = header.next().unwrap_or_default();
        let labels: Vec<String> = header.collect();
        let periods = PeriodSeq::parse(&labels)?;
        let width = labels.len() + 1;

        let mut rows = Vec::new();
        for (i, record) in iter.enumerate() {
            if record.len() != width {
                return Err(FormatError::FieldCountMismatch {
                    row: i + 1,
                    expected: width,
                    found: record.len(),
                });
            }
            let mut fields = record.into_iter();
            let label = fields.next().unwrap_or_default();
            rows.push(Row {
                label,
                values: fields.collect(),
            });
        }

        Ok(Self {
            label,
            periods,
            rows,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let records = read_records_from_path(path)?;
        Self::from_records(records).with_context(|| format!("invalid table {:?}", path))
    }

    /// Fail unless the header is the statement date header with at least one
    /// period.
    pub fn require_date_header(&self) -> Result<(), FormatError> {
        if self.label != DATE_HEADER {
            return Err(FormatError::MissingDateHeader {
                expected: DATE_HEADER,
                found: self.label.clone(),
            });
        }
        if self.periods.is_empty() {
            return Err(FormatError::NoPeriods);
        }
        Ok(())
    }

    pub fn to_records(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        let mut header = vec![self.label.clone()];
        header.extend(self.periods.labels());
        out.push(header);
        for row in &self.rows {
            let mut r = Vec::with_capacity(row.values.len() + 1);
            r.push(row.label.clone());
            r.extend(row.values.iter().cloned());
            out.push(r);
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_records(path, self.to_records())
    }
}
