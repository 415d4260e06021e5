pub mod filter;
pub mod metrics;

pub use filter::{CategoryTab, DashboardFilter, DealColumn};
pub use metrics::{compute_metrics, Breakdown, SalesMetrics, SeriesPoint, VolumeSummary};
