//! Query facade over the loaded dataset

use std::sync::Arc;

use crate::services::{Aggregator, KpiCalculator};
use crate::types::{
    CustomerTrendPoint, Dataset, HealthStatus, KpiSummary, MonthlyRevenue, RegionRevenue,
};

/// Answers every insight query against one shared, read-only dataset.
///
/// Cloning is cheap; all clones see the same dataset. Results are computed
/// fresh on every call.
#[derive(Debug, Clone)]
pub struct InsightsService {
    dataset: Arc<Dataset>,
}

impl InsightsService {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::from_dataset(&self.dataset)
    }

    pub fn kpis(&self) -> KpiSummary {
        KpiCalculator::compute(self.dataset.records())
    }

    pub fn revenue_by_month(&self) -> Vec<MonthlyRevenue> {
        Aggregator::revenue_by_month(self.dataset.records())
    }

    pub fn revenue_by_region(&self) -> Vec<RegionRevenue> {
        Aggregator::revenue_by_region(self.dataset.records())
    }

    pub fn customer_trend(&self) -> Vec<CustomerTrendPoint> {
        Aggregator::customer_trend(self.dataset.records())
    }
}
