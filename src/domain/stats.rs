//! Moderator statistics payloads served under `/stats`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reporting window for the statistics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsPeriod {
    Today,
    #[default]
    Week,
    Month,
    /// Explicit inclusive date range.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl StatsPeriod {
    /// Wire name sent as the `period` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Custom { .. } => "custom",
        }
    }

    /// Parses `today`, `week` or `month`. Custom ranges need explicit dates.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Today => "Сегодня",
            Self::Week => "Последние 7 дней",
            Self::Month => "Последние 30 дней",
            Self::Custom { .. } => "Произвольный период",
        }
    }

    /// Query pairs for the stats endpoints, in a fixed order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("period", self.as_str().to_string())];
        if let Self::Custom { start, end } = self {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

/// Body of `GET /stats/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_reviewed: u64,
    pub total_reviewed_today: u64,
    pub total_reviewed_this_week: u64,
    pub total_reviewed_this_month: u64,
    pub approved_percentage: f64,
    pub rejected_percentage: f64,
    pub request_changes_percentage: f64,
    /// Average review time in seconds; usually fractional.
    pub average_review_time: f64,
}

/// One day of `GET /stats/chart/activity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
    pub date: NaiveDate,
    pub approved: u64,
    pub rejected: u64,
    pub request_changes: u64,
}

impl ActivityData {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.approved + self.rejected + self.request_changes
    }
}

/// Body of `GET /stats/chart/decisions`, expressed in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionsData {
    pub approved: f64,
    pub rejected: f64,
    pub request_changes: f64,
}

/// Body of `GET /stats/chart/categories`: category name → reviewed count.
pub type CategoryCounts = BTreeMap<String, u64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_accepts_fractional_review_time() {
        let body = r#"{
            "totalReviewed": 120,
            "totalReviewedToday": 4,
            "totalReviewedThisWeek": 30,
            "totalReviewedThisMonth": 120,
            "approvedPercentage": 66.7,
            "rejectedPercentage": 20.0,
            "requestChangesPercentage": 13.3,
            "averageReviewTime": 156.4
        }"#;
        let summary: StatsSummary = serde_json::from_str(body).unwrap();
        assert!((summary.average_review_time - 156.4).abs() < 1e-9);
    }

    #[test]
    fn custom_period_carries_dates() {
        let period = StatsPeriod::Custom {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert_eq!(
            period.query_pairs(),
            vec![
                ("period", "custom".to_string()),
                ("startDate", "2024-01-01".to_string()),
                ("endDate", "2024-01-31".to_string()),
            ]
        );
    }

    #[test]
    fn named_periods_parse() {
        assert_eq!(StatsPeriod::parse("month"), Some(StatsPeriod::Month));
        assert_eq!(StatsPeriod::parse("custom"), None);
        assert_eq!(StatsPeriod::default().query_pairs(), vec![("period", "week".to_string())]);
    }

    #[test]
    fn activity_decodes_and_totals() {
        let day: ActivityData = serde_json::from_str(
            r#"{"date":"2024-01-15","approved":5,"rejected":2,"requestChanges":1}"#,
        )
        .unwrap();
        assert_eq!(day.total(), 8);
    }
}
