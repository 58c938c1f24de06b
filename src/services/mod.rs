//! Services for data aggregation and KPI calculation

pub mod aggregator;
pub mod insights;
pub mod kpi;

pub use aggregator::Aggregator;
pub use insights::InsightsService;
pub use kpi::KpiCalculator;
