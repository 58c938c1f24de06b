//! Group-by aggregation over sales records
//!
//! Every grouping is keyed through a `BTreeMap`, so results come out sorted
//! ascending by key without a separate sort step.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::types::{CustomerTrendPoint, MonthlyRevenue, RegionRevenue, SalesRecord};

/// Summed numeric columns for one group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupTotals {
    pub revenue: f64,
    pub customers: u64,
    pub churned: u64,
    pub rows: usize,
}

impl GroupTotals {
    fn add(&mut self, record: &SalesRecord) {
        self.revenue += record.revenue;
        self.customers = self.customers.saturating_add(record.customers);
        self.churned = self.churned.saturating_add(record.churned);
        self.rows += 1;
    }
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotals {
    pub month: String,
    pub totals: GroupTotals,
}

pub struct Aggregator;

impl Aggregator {
    /// Group records by an extracted key, summing every numeric column
    pub fn group_by<K, F>(records: &[SalesRecord], key: F) -> BTreeMap<K, GroupTotals>
    where
        K: Ord,
        F: Fn(&SalesRecord) -> K,
    {
        let mut groups: BTreeMap<K, GroupTotals> = BTreeMap::new();
        for record in records {
            groups.entry(key(record)).or_default().add(record);
        }
        groups
    }

    /// Sum over the whole table as a single group
    pub fn totals(records: &[SalesRecord]) -> GroupTotals {
        let mut totals = GroupTotals::default();
        for record in records {
            totals.add(record);
        }
        totals
    }

    /// Per-month totals, ascending by month
    pub fn monthly(records: &[SalesRecord]) -> Vec<MonthTotals> {
        Self::group_by(records, |r| r.month.clone())
            .into_iter()
            .map(|(month, totals)| MonthTotals { month, totals })
            .collect()
    }

    /// Revenue per month, ascending by month
    pub fn revenue_by_month(records: &[SalesRecord]) -> Vec<MonthlyRevenue> {
        Self::monthly(records)
            .into_iter()
            .map(|m| MonthlyRevenue {
                month: m.month,
                revenue: m.totals.revenue,
            })
            .collect()
    }

    /// Revenue per region, ascending by region name
    pub fn revenue_by_region(records: &[SalesRecord]) -> Vec<RegionRevenue> {
        Self::group_by(records, |r| r.region.clone())
            .into_iter()
            .map(|(region, totals)| RegionRevenue {
                region,
                revenue: totals.revenue,
            })
            .collect()
    }

    /// Customers per exact calendar date, ascending by date
    pub fn customer_trend(records: &[SalesRecord]) -> Vec<CustomerTrendPoint> {
        Self::group_by(records, |r| r.date)
            .into_iter()
            .map(|(date, totals): (NaiveDate, GroupTotals)| CustomerTrendPoint {
                date: date.format("%Y-%m-%d").to_string(),
                customers: totals.customers,
            })
            .collect()
    }
}
