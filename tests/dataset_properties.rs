//! Aggregation invariants checked against datasets loaded from disk

use std::collections::BTreeSet;
use std::io::Write;

use mos_insights::parsers::{SalesCsvParser, SourceParser};
use mos_insights::services::kpi::round2;
use mos_insights::services::InsightsService;
use tempfile::NamedTempFile;

fn load(rows: &[&str]) -> InsightsService {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,revenue,region,customers,churned").unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    let dataset = SalesCsvParser::new().load(file.path()).unwrap();
    InsightsService::new(dataset)
}

fn year_of_rows() -> Vec<String> {
    let regions = ["North", "South", "East", "West"];
    let mut rows = Vec::new();
    for month in 1..=12u32 {
        for day in [3u32, 11, 19, 27] {
            for (i, region) in regions.iter().enumerate() {
                let revenue = 100.0 + (month * 13 + day * 7 + i as u32 * 5) as f64 * 1.37;
                let customers = 10 + (month + day + i as u32) % 17;
                let churned = (month + i as u32) % 3;
                rows.push(format!(
                    "2023-{:02}-{:02},{:.2},{},{},{}",
                    month, day, revenue, region, customers, churned
                ));
            }
        }
    }
    rows
}

#[test]
fn test_total_revenue_is_rounded_row_sum() {
    let rows = year_of_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let svc = load(&refs);

    let row_sum: f64 = svc.dataset().records().iter().map(|r| r.revenue).sum();
    assert_eq!(svc.kpis().total_revenue, round2(row_sum));
}

#[test]
fn test_monthly_covers_each_month_once_sorted() {
    let rows = year_of_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let svc = load(&refs);

    let monthly = svc.revenue_by_month();
    let months: Vec<&str> = monthly.iter().map(|m| m.month.as_str()).collect();
    let distinct: BTreeSet<&str> = svc
        .dataset()
        .records()
        .iter()
        .map(|r| r.month.as_str())
        .collect();

    assert_eq!(months, distinct.into_iter().collect::<Vec<_>>());
    for entry in &monthly {
        let expected: f64 = svc
            .dataset()
            .records()
            .iter()
            .filter(|r| r.month == entry.month)
            .map(|r| r.revenue)
            .sum();
        assert!((entry.revenue - expected).abs() < 1e-9);
    }
}

#[test]
fn test_trend_covers_each_date_once_sorted() {
    let rows = year_of_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let svc = load(&refs);

    let trend = svc.customer_trend();
    assert_eq!(trend.len(), 48);
    assert!(trend.windows(2).all(|w| w[0].date < w[1].date));

    let total: u64 = trend.iter().map(|t| t.customers).sum();
    assert_eq!(total, svc.kpis().customers);
}

#[test]
fn test_single_month_dataset_has_zero_growth() {
    let svc = load(&[
        "2024-06-01,100,North,10,1",
        "2024-06-15,900,South,10,1",
    ]);
    assert_eq!(svc.kpis().monthly_growth_pct, 0.0);
}

#[test]
fn test_zero_previous_month_has_zero_growth() {
    let svc = load(&["2024-05-31,0,North,10,1", "2024-06-01,250,North,10,1"]);
    assert_eq!(svc.kpis().monthly_growth_pct, 0.0);
}

#[test]
fn test_zero_customers_has_zero_churn() {
    let svc = load(&["2024-05-31,10,North,0,4", "2024-06-01,20,North,0,2"]);
    let kpis = svc.kpis();
    assert_eq!(kpis.churn_rate_pct, 0.0);
    assert_eq!(kpis.customers, 0);
}

#[test]
fn test_health_after_two_rows() {
    let svc = load(&[
        "2024-01-01,100,regionA,10,1",
        "2024-02-01,150,regionA,12,2",
    ]);
    let health = svc.health();

    assert_eq!(health.records, 2);
    assert!(!health.status.is_empty());
    assert!(!health.version.is_empty());
    assert!(!health.last_updated.is_empty());

    let kpis = svc.kpis();
    assert_eq!(kpis.total_revenue, 250.0);
    assert_eq!(kpis.monthly_growth_pct, 50.0);
    assert_eq!(kpis.churn_rate_pct, 13.64);
    assert_eq!(kpis.customers, 22);
}
