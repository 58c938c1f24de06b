//! Sales CSV parser

use crate::types::{InsightsError, Result, SalesRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

use super::SourceParser;

const COL_DATE: &str = "date";
const COL_REVENUE: &str = "revenue";
const COL_REGION: &str = "region";
const COL_CUSTOMERS: &str = "customers";
const COL_CHURNED: &str = "churned";

/// Resolved header positions of the required columns
struct ColumnIndex {
    date: usize,
    revenue: usize,
    region: usize,
    customers: usize,
    churned: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(InsightsError::MissingColumn(name))
        };

        Ok(Self {
            date: find(COL_DATE)?,
            revenue: find(COL_REVENUE)?,
            region: find(COL_REGION)?,
            customers: find(COL_CUSTOMERS)?,
            churned: find(COL_CHURNED)?,
        })
    }
}

/// Parser for the `date,revenue,region,customers,churned` sales table
#[derive(Debug, Default, Clone, Copy)]
pub struct SalesCsvParser;

impl SalesCsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV from any reader. Rows are numbered from 1, excluding the header.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<SalesRecord>> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let columns = ColumnIndex::from_headers(rdr.headers()?)?;

        let mut records = Vec::new();
        let (mut customers, mut churned) = (0u64, 0u64);
        for (idx, result) in rdr.records().enumerate() {
            let row = result?;
            let record = parse_row(&row, &columns, idx + 1)?;

            // Dataset-wide totals must fit, so every group sum fits too
            customers = customers
                .checked_add(record.customers)
                .ok_or_else(|| total_overflow(idx + 1, COL_CUSTOMERS))?;
            churned = churned
                .checked_add(record.churned)
                .ok_or_else(|| total_overflow(idx + 1, COL_CHURNED))?;

            records.push(record);
        }
        Ok(records)
    }
}

impl SourceParser for SalesCsvParser {
    fn name(&self) -> &str {
        "sales-csv"
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<SalesRecord>> {
        let file = std::fs::File::open(path).map_err(InsightsError::Io)?;
        self.parse_reader(file)
    }
}

fn parse_row(row: &StringRecord, columns: &ColumnIndex, row_num: usize) -> Result<SalesRecord> {
    let field = |idx: usize, name: &str| {
        row.get(idx).ok_or_else(|| InsightsError::InvalidRow {
            row: row_num,
            message: format!("missing value for '{}'", name),
        })
    };
    let invalid = |message: String| InsightsError::InvalidRow {
        row: row_num,
        message,
    };

    let raw_date = field(columns.date, COL_DATE)?;
    let date =
        parse_date(raw_date).ok_or_else(|| invalid(format!("invalid date '{}'", raw_date)))?;

    let raw_revenue = field(columns.revenue, COL_REVENUE)?;
    let revenue: f64 = raw_revenue
        .parse()
        .map_err(|_| invalid(format!("invalid revenue '{}'", raw_revenue)))?;
    if !revenue.is_finite() || revenue < 0.0 {
        return Err(invalid(format!(
            "revenue must be a non-negative amount, got '{}'",
            raw_revenue
        )));
    }

    let region = field(columns.region, COL_REGION)?.to_string();
    let customers = parse_count(field(columns.customers, COL_CUSTOMERS)?, COL_CUSTOMERS)
        .map_err(invalid)?;
    let churned =
        parse_count(field(columns.churned, COL_CHURNED)?, COL_CHURNED).map_err(invalid)?;

    Ok(SalesRecord::new(date, region, revenue, customers, churned))
}

fn total_overflow(row: usize, name: &str) -> InsightsError {
    InsightsError::InvalidRow {
        row,
        message: format!("{} total exceeds {}", name, u64::MAX),
    }
}

fn parse_count(raw: &str, name: &str) -> std::result::Result<u64, String> {
    raw.parse()
        .map_err(|_| format!("invalid {} count '{}'", name, raw))
}

/// Parse a calendar date, accepting plain dates and date-times (time is dropped).
///
/// # Examples
/// - "2024-03-17" → 2024-03-17
/// - "2024-03-17 23:59:59" → 2024-03-17
/// - "2024-03-17T08:15" → 2024-03-17
/// - "2024-03-17T08:00:00+09:00" → 2024-03-17
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
