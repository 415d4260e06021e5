//! KPI totals and grouped chart series derived from the current row set.
//!
//! Nothing here is persisted: metrics are recomputed from the filtered rows on
//! every render. Sums stay unrounded until display formatting.

use crate::domain::a001_sales_order::aggregate::OrderRecord;
use crate::shared::br_states::normalize_state_name;
use crate::shared::dates::{is_same_day, is_same_month, parse_date_or_epoch};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sum of values over all matching rows, and over those dated today / this month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub total: f64,
    pub today: f64,
    pub month: f64,
}

impl VolumeSummary {
    fn add(&mut self, value: f64, date: NaiveDate, today: NaiveDate) {
        self.total += value;
        if is_same_day(date, today) {
            self.today += value;
        }
        if is_same_month(date, today) {
            self.month += value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

/// Grouped series by state, origin and professional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub states: Vec<SeriesPoint>,
    pub origins: Vec<SeriesPoint>,
    pub professionals: Vec<SeriesPoint>,
}

impl Breakdown {
    fn of<'a>(rows: impl Iterator<Item = &'a OrderRecord> + Clone) -> Self {
        Self {
            states: group_by(rows.clone(), |r| normalize_state_name(&r.state)),
            origins: group_by(rows.clone(), |r| r.origin.trim().to_string()),
            professionals: group_by(rows, |r| r.professional.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesMetrics {
    /// Won deals with a closing date, dated by closing date.
    pub closed_volume: VolumeSummary,
    /// Won or in-progress deals, dated by issue date.
    pub quoted_volume: VolumeSummary,
    pub top_states: Vec<SeriesPoint>,
    pub top_origins: Vec<SeriesPoint>,
    pub top_professionals: Vec<SeriesPoint>,
    pub closed_breakdown: Breakdown,
    pub quoted_breakdown: Breakdown,
}

impl SalesMetrics {
    /// Closed over quoted, as a whole percentage; 0 when nothing is quoted.
    pub fn conversion_percent(&self) -> u32 {
        conversion_percent(self.closed_volume.total, self.quoted_volume.total)
    }
}

pub fn compute_metrics(rows: &[OrderRecord], today: NaiveDate) -> SalesMetrics {
    let mut closed_volume = VolumeSummary::default();
    let mut quoted_volume = VolumeSummary::default();

    for row in rows {
        if row.counts_as_closed() {
            let closed_on = parse_date_or_epoch(row.closing_date.as_deref());
            closed_volume.add(row.value, closed_on, today);
        }
        if row.status.is_active() {
            let issued_on = parse_date_or_epoch(Some(&row.issue_date));
            quoted_volume.add(row.value, issued_on, today);
        }
    }

    let closed = rows.iter().filter(|r| r.counts_as_closed());
    let quoted = rows.iter().filter(|r| r.status.is_active());
    let quoted_breakdown = Breakdown::of(quoted);

    SalesMetrics {
        closed_volume,
        quoted_volume,
        top_states: quoted_breakdown.states.clone(),
        top_origins: quoted_breakdown.origins.clone(),
        top_professionals: quoted_breakdown.professionals.clone(),
        closed_breakdown: Breakdown::of(closed),
        quoted_breakdown,
    }
}

pub fn conversion_percent(closed: f64, quoted: f64) -> u32 {
    if quoted <= 0.0 {
        return 0;
    }
    (closed / quoted * 100.0).round().max(0.0) as u32
}

/// Share of one point in its series, in percent (tooltip text).
pub fn share_percent(point: &SeriesPoint, series: &[SeriesPoint]) -> f64 {
    let total = series_total(series);
    if total <= 0.0 {
        0.0
    } else {
        point.value / total * 100.0
    }
}

pub fn series_total(series: &[SeriesPoint]) -> f64 {
    series.iter().map(|p| p.value).sum()
}

/// Sums `value` per key, descending by sum.
///
/// Rows whose key is empty are skipped. Ties keep first-seen order.
pub fn group_by<'a>(
    rows: impl Iterator<Item = &'a OrderRecord>,
    key: impl Fn(&OrderRecord) -> String,
) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = key(row);
        if name.is_empty() {
            continue;
        }
        match index.get(&name) {
            Some(&i) => series[i].value += row.value,
            None => {
                index.insert(name.clone(), series.len());
                series.push(SeriesPoint {
                    name,
                    value: row.value,
                });
            }
        }
    }

    series.sort_by(|a, b| b.value.total_cmp(&a.value));
    series
}
