//! Core data types for the insights API

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// API version reported by the health endpoint
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-readable service title
pub const API_TITLE: &str = "Mos Insights API";

/// Errors raised while loading or configuring the service
#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InsightsError>;

/// Format a date as its calendar month key, e.g. 2024-03-17 → "2024-03"
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// ISO-8601 local timestamp at microsecond precision; the fraction is
/// omitted when it is zero (e.g. "2024-01-01T12:00:00").
pub fn iso_timestamp(ts: NaiveDateTime) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// A single row of the sales table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    /// Derived from `date` at load time ("YYYY-MM")
    pub month: String,
    pub region: String,
    pub revenue: f64,
    pub customers: u64,
    pub churned: u64,
}

impl SalesRecord {
    /// Build a record, deriving the month key from the date
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        revenue: f64,
        customers: u64,
        churned: u64,
    ) -> Self {
        Self {
            date,
            month: month_key(date),
            region: region.into(),
            revenue,
            customers,
            churned,
        }
    }
}

/// The loaded sales table. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    loaded_at: DateTime<Local>,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Wrap already-parsed records, stamping the load time as now
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self {
            records,
            loaded_at: Local::now(),
            source: None,
        }
    }

    /// Attach the file the records were read from
    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }
}

/// Headline KPIs over the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub monthly_growth_pct: f64,
    pub churn_rate_pct: f64,
    pub customers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerTrendPoint {
    /// "YYYY-MM-DD"
    pub date: String,
    pub customers: u64,
}

/// Liveness payload for `/api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub records: usize,
    pub last_updated: String,
}

impl HealthStatus {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            status: "ok".to_string(),
            version: API_VERSION.to_string(),
            records: dataset.len(),
            last_updated: iso_timestamp(dataset.loaded_at().naive_local()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
