//! Demo P&L data for a single restaurant location, January to December.
//!
//! Regenerated on every call; callers own the returned series.

use crate::types::{MetricTrendSeries, MetricUnit, MonthlyDataPoint};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SALES: [f64; 12] = [
    162_400.0, 158_900.0, 171_200.0, 176_800.0, 184_300.0, 191_500.0, 198_200.0, 195_600.0,
    182_100.0, 179_400.0, 174_900.0, 176_400.0,
];
const SALES_TARGET: f64 = 180_000.0;

const NET_INCOME: [f64; 12] = [14.2, 13.8, 15.1, 15.6, 16.0, 16.4, 16.9, 16.2, 15.3, 14.6, 14.0, 13.3];
const NET_INCOME_TARGET: f64 = 15.0;

const COGS: [f64; 12] = [25.1, 25.4, 24.8, 24.2, 24.0, 23.9, 24.5, 25.6, 26.8, 27.9, 29.4, 31.0];
const COGS_TARGET: f64 = 24.0;

const LABOR: [f64; 12] = [34.2, 34.6, 33.8, 33.1, 32.7, 32.2, 31.8, 32.0, 32.4, 32.1, 31.8, 31.5];
const LABOR_TARGET: f64 = 36.0;

const FOH_LABOR: [f64; 12] = [21.4, 21.9, 21.2, 20.8, 20.6, 20.9, 21.8, 22.4, 23.1, 23.6, 24.2, 24.8];
const FOH_LABOR_TARGET: f64 = 21.0;

const PRIME_COST_TARGET: f64 = COGS_TARGET + LABOR_TARGET;

fn monthly(values: &[f64; 12], target: f64) -> Vec<MonthlyDataPoint> {
    MONTHS
        .iter()
        .zip(values.iter())
        .map(|(month, actual)| MonthlyDataPoint::new(*month, *actual, target))
        .collect()
}

/// All demo series: sales, net income, prime cost, COGS, labor, FOH labor.
pub fn demo_series() -> Vec<MetricTrendSeries> {
    let mut prime_cost = [0.0; 12];
    for (i, slot) in prime_cost.iter_mut().enumerate() {
        *slot = ((COGS[i] + LABOR[i]) * 10.0).round() / 10.0;
    }

    vec![
        MetricTrendSeries::new("sales", "Net Sales", MetricUnit::Currency, false, monthly(&SALES, SALES_TARGET)),
        MetricTrendSeries::new(
            "net-income",
            "Net Income Margin",
            MetricUnit::Percentage,
            false,
            monthly(&NET_INCOME, NET_INCOME_TARGET),
        ),
        MetricTrendSeries::new(
            "prime-cost",
            "Prime Cost",
            MetricUnit::Percentage,
            true,
            monthly(&prime_cost, PRIME_COST_TARGET),
        ),
        MetricTrendSeries::new("cogs", "Food Cost", MetricUnit::Percentage, true, monthly(&COGS, COGS_TARGET)),
        MetricTrendSeries::new("labor", "Labor", MetricUnit::Percentage, true, monthly(&LABOR, LABOR_TARGET)),
        MetricTrendSeries::new(
            "foh-labor",
            "FOH Labor",
            MetricUnit::Percentage,
            true,
            monthly(&FOH_LABOR, FOH_LABOR_TARGET),
        ),
    ]
}
