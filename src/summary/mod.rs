//! Monthly and per-category expense totals, served as JSON and drawn as charts.

mod aggregation;
mod api;
mod charts;

pub use aggregation::{ChartSeries, category_totals, monthly_totals};
pub use api::{get_category_data, get_monthly_data};
pub use charts::{SummaryChart, category_chart, charts_script, charts_view, monthly_chart};
