#![forbid(unsafe_code)]

use mt_core::progress::{MonthBucket, PortfolioSummary, VendorPerformance};

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsSummary {
    pub portfolio: PortfolioSummary,
    pub months: Vec<MonthBucket>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VendorPerformanceRow {
    pub vendor_name: String,
    pub performance: VendorPerformance,
}
