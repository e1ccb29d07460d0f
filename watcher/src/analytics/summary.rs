//! Analytics aggregation
//!
//! Pure mapping from a deployment list to derived statistics. Nothing here
//! is persisted; the server layer recomputes a summary from the current
//! snapshot on demand.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::models::deployment::{Deployment, DeploymentStatus, DeploymentType};

/// Placeholder average until the backend reports per-record start/finish
/// timestamps. Matches the figure the dashboard has always shown.
const ASSUMED_DEPLOY_SECONDS: u32 = 45;

/// Number of trailing calendar months in the histogram, current included
const TREND_MONTHS: u32 = 6;

/// Average deploy duration, typed so a placeholder can never be mistaken
/// for a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "seconds", rename_all = "lowercase")]
pub enum DeployTimeEstimate {
    /// Fixed assumption; the backend does not expose deploy durations yet
    Assumed(u32),
    /// Computed from backend-reported timestamps
    Measured(u32),
}

/// Counts per deployment type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub git: usize,
    pub zip: usize,
}

/// One slice of the status distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: DeploymentStatus,
    pub count: usize,
    /// Rounded independently per slice; the set need not sum to 100
    pub percentage: u32,
}

/// One calendar-month bucket of the trend histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Human label, e.g. "Mar 2024"
    pub label: String,
    pub count: usize,
}

/// Derived statistics over one deployment list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_deployments: usize,
    pub successful_deployments: usize,
    pub failed_deployments: usize,
    pub average_deploy_time: DeployTimeEstimate,
    pub deployments_by_type: TypeCounts,
    /// Oldest first, anchored to the current calendar month
    pub deployments_by_month: Vec<MonthBucket>,
    /// Statuses present in the list, in declaration order
    pub status_distribution: Vec<StatusSlice>,
}

impl AnalyticsSummary {
    /// Share of deployments currently serving, rounded to whole percent
    pub fn success_rate_percent(&self) -> u32 {
        percentage(self.successful_deployments, self.total_deployments)
    }
}

/// Summarize a deployment list against the real clock
pub fn summarize(records: &[Deployment]) -> AnalyticsSummary {
    summarize_at(records, Utc::now())
}

/// Summarize a deployment list as of `now`.
///
/// Total function: never fails, an empty list yields a zeroed summary with
/// all six month buckets present.
pub fn summarize_at(records: &[Deployment], now: DateTime<Utc>) -> AnalyticsSummary {
    let total = records.len();
    let successful = records
        .iter()
        .filter(|r| r.status == DeploymentStatus::Running)
        .count();
    let failed = records
        .iter()
        .filter(|r| r.status == DeploymentStatus::Failed)
        .count();

    let mut by_type = TypeCounts::default();
    for record in records {
        match record.deployment_type {
            DeploymentType::Git => by_type.git += 1,
            DeploymentType::Zip => by_type.zip += 1,
        }
    }

    let status_distribution = DeploymentStatus::all()
        .into_iter()
        .filter_map(|status| {
            let count = records.iter().filter(|r| r.status == status).count();
            (count > 0).then(|| StatusSlice {
                status,
                count,
                percentage: percentage(count, total),
            })
        })
        .collect();

    AnalyticsSummary {
        total_deployments: total,
        successful_deployments: successful,
        failed_deployments: failed,
        average_deploy_time: DeployTimeEstimate::Assumed(ASSUMED_DEPLOY_SECONDS),
        deployments_by_type: by_type,
        deployments_by_month: monthly_trend(records, now),
        status_distribution,
    }
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}

/// Trailing 6-month histogram, oldest bucket first.
///
/// Bucketing compares the record's calendar (year, month) against each
/// offset month, not elapsed days, so a record from the 31st and one from
/// the 1st of the same month always share a bucket.
fn monthly_trend(records: &[Deployment], now: DateTime<Utc>) -> Vec<MonthBucket> {
    (0..TREND_MONTHS)
        .rev()
        .map(|offset| {
            let (year, month) = month_back(now.year(), now.month(), offset);
            let count = records
                .iter()
                .filter_map(|r| r.created_at)
                .filter(|created| created.year() == year && created.month() == month)
                .count();
            MonthBucket {
                label: month_label(year, month),
                count,
            }
        })
        .collect()
}

/// Calendar month `offset` months before (year, month), month in 1..=12
fn month_back(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) - offset as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

fn month_label(year: i32, month: u32) -> String {
    // month is always 1..=12 here
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{:02} {}", month, year))
}
