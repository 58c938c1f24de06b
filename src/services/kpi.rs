//! KPI summary calculation
//!
//! Growth and churn fall back to 0.0 whenever their denominator is zero, so
//! every field of the summary is always a finite number.

use crate::services::aggregator::{Aggregator, MonthTotals};
use crate::types::{KpiSummary, SalesRecord};

/// Round to two decimal places, ties to even on the exact binary value.
///
/// Float formatting is correctly rounded, so 0.125 becomes 0.12 and 2.675
/// (stored as 2.67499...) becomes 2.67.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Month-over-month revenue growth between the last two months, in percent.
///
/// `monthly` must be sorted ascending by month.
pub fn monthly_growth_pct(monthly: &[MonthTotals]) -> f64 {
    let [.., previous, latest] = monthly else {
        return 0.0;
    };

    let prev = previous.totals.revenue;
    if prev == 0.0 {
        return 0.0;
    }
    (latest.totals.revenue - prev) / prev * 100.0
}

/// Churned customers as a percentage of all customers
pub fn churn_rate_pct(churned: u64, customers: u64) -> f64 {
    if customers == 0 {
        return 0.0;
    }
    churned as f64 / customers as f64 * 100.0
}

pub struct KpiCalculator;

impl KpiCalculator {
    pub fn compute(records: &[SalesRecord]) -> KpiSummary {
        let monthly = Aggregator::monthly(records);
        let totals = Aggregator::totals(records);

        KpiSummary {
            total_revenue: round2(totals.revenue),
            monthly_growth_pct: round2(monthly_growth_pct(&monthly)),
            churn_rate_pct: round2(churn_rate_pct(totals.churned, totals.customers)),
            customers: totals.customers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record(
        year: i32,
        month: u32,
        day: u32,
        revenue: f64,
        customers: u64,
        churned: u64,
    ) -> SalesRecord {
        SalesRecord::new(
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            "North",
            revenue,
            customers,
            churned,
        )
    }

    #[test]
    fn test_two_month_example() {
        let records = vec![
            make_record(2024, 1, 1, 100.0, 10, 1),
            make_record(2024, 2, 1, 150.0, 12, 2),
        ];
        let kpis = KpiCalculator::compute(&records);

        assert_eq!(
            kpis,
            KpiSummary {
                total_revenue: 250.0,
                monthly_growth_pct: 50.0,
                churn_rate_pct: 13.64,
                customers: 22,
            }
        );
    }

    #[test]
    fn test_empty_dataset_is_all_zero() {
        let kpis = KpiCalculator::compute(&[]);

        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.monthly_growth_pct, 0.0);
        assert_eq!(kpis.churn_rate_pct, 0.0);
        assert_eq!(kpis.customers, 0);
    }

    #[test]
    fn test_single_month_has_no_growth() {
        let records = vec![
            make_record(2024, 5, 1, 100.0, 10, 1),
            make_record(2024, 5, 20, 300.0, 10, 1),
        ];
        assert_eq!(KpiCalculator::compute(&records).monthly_growth_pct, 0.0);
    }

    #[test]
    fn test_growth_from_zero_month_falls_back_to_zero() {
        let records = vec![
            make_record(2024, 1, 1, 0.0, 10, 0),
            make_record(2024, 2, 1, 500.0, 10, 0),
        ];
        assert_eq!(KpiCalculator::compute(&records).monthly_growth_pct, 0.0);
    }

    #[test]
    fn test_growth_uses_last_two_months_by_order_not_file_order() {
        let records = vec![
            make_record(2024, 3, 1, 90.0, 1, 0),
            make_record(2024, 1, 1, 1000.0, 1, 0),
            make_record(2024, 2, 1, 120.0, 1, 0),
        ];
        // (90 - 120) / 120 * 100
        assert_eq!(KpiCalculator::compute(&records).monthly_growth_pct, -25.0);
    }

    #[test]
    fn test_growth_sums_within_month() {
        let records = vec![
            make_record(2024, 1, 1, 50.0, 1, 0),
            make_record(2024, 1, 31, 50.0, 1, 0),
            make_record(2024, 2, 14, 133.333, 1, 0),
        ];
        assert_eq!(KpiCalculator::compute(&records).monthly_growth_pct, 33.33);
    }

    #[test]
    fn test_churn_with_zero_customers_is_zero() {
        let records = vec![make_record(2024, 1, 1, 10.0, 0, 5)];
        assert_eq!(KpiCalculator::compute(&records).churn_rate_pct, 0.0);
    }

    #[test]
    fn test_total_revenue_rounded() {
        let records = vec![
            make_record(2024, 1, 1, 0.1, 1, 0),
            make_record(2024, 1, 2, 0.2, 1, 0),
            make_record(2024, 1, 3, 10.006, 1, 0),
        ];
        assert_eq!(KpiCalculator::compute(&records).total_revenue, 10.31);
    }

    // ========== helpers ==========

    #[test]
    fn test_round2() {
        assert_eq!(round2(13.636363), 13.64);
        assert_eq!(round2(-25.0), -25.0);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(2.5), 2.5);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_churn_one_in_eight_hundred() {
        assert_eq!(round2(churn_rate_pct(1, 800)), 0.12);

        let records = vec![make_record(2024, 1, 1, 2.675, 800, 1)];
        let kpis = KpiCalculator::compute(&records);
        assert_eq!(kpis.churn_rate_pct, 0.12);
        assert_eq!(kpis.total_revenue, 2.67);
    }

    #[test]
    fn test_churn_rate_pct() {
        assert_eq!(churn_rate_pct(1, 4), 25.0);
        assert_eq!(churn_rate_pct(3, 0), 0.0);
        assert_eq!(churn_rate_pct(0, 10), 0.0);
    }

    #[test]
    fn test_monthly_growth_pct_needs_two_months() {
        assert_eq!(monthly_growth_pct(&[]), 0.0);
    }
}
