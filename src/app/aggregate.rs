//! Client-side derivations over statistics payloads.
//!
//! Everything here is a pure function of the payloads it is given and is
//! recomputed on every call; nothing is cached between periods. Bar and ring
//! ratios are percentages of the largest value in the same bucket set, so the
//! largest bar is always 100 and an all-zero set renders as empty bars.

use crate::domain::{ActivityData, CategoryCounts, DecisionsData, StatsPeriod, StatsSummary};
use crate::ui::viewmodel::{ActivityBar, CategoryBar, DecisionSlice, StatsViewModel, SummaryCard};

/// The four stats payloads of one period.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsData {
    pub summary: StatsSummary,
    pub activity: Vec<ActivityData>,
    pub decisions: DecisionsData,
    pub categories: CategoryCounts,
}

/// Formats a percentage with one decimal.
///
/// # Examples
///
/// ```
/// use marketmod::app::aggregate::format_percentage;
///
/// assert_eq!(format_percentage(72.345), "72.3%");
/// assert_eq!(format_percentage(0.0), "0.0%");
/// ```
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Formats a duration in seconds as minutes and whole seconds.
///
/// Fractions are floored; negative or non-finite input counts as zero.
///
/// # Examples
///
/// ```
/// use marketmod::app::aggregate::format_duration;
///
/// assert_eq!(format_duration(125.0), "2м 5с");
/// assert_eq!(format_duration(59.9), "0м 59с");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}м {}с", whole / 60, whole % 60)
}

/// Each value as a percentage of the maximum; all zeros when the maximum is 0.
#[must_use]
pub fn ratios(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    values
        .iter()
        .map(|v| if max > 0.0 { v / max * 100.0 } else { 0.0 })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn counts_as_f64(values: impl Iterator<Item = u64>) -> Vec<f64> {
    values.map(|v| v as f64).collect()
}

/// Daily activity bars, in payload order.
#[must_use]
pub fn activity_bars(activity: &[ActivityData]) -> Vec<ActivityBar> {
    let bar_ratios = ratios(&counts_as_f64(activity.iter().map(ActivityData::total)));
    activity
        .iter()
        .zip(bar_ratios)
        .map(|(day, ratio)| ActivityBar {
            label: day.date.format("%d.%m").to_string(),
            approved: day.approved,
            rejected: day.rejected,
            request_changes: day.request_changes,
            total: day.total(),
            ratio,
        })
        .collect()
}

/// Decision shares: approved, rejected, sent back for changes.
#[must_use]
pub fn decision_slices(decisions: &DecisionsData) -> Vec<DecisionSlice> {
    let values = [
        ("Одобрено", decisions.approved),
        ("Отклонено", decisions.rejected),
        ("На доработку", decisions.request_changes),
    ];
    let slice_ratios = ratios(&values.map(|(_, v)| v));
    values
        .into_iter()
        .zip(slice_ratios)
        .map(|((label, value), ratio)| DecisionSlice {
            label,
            share: format_percentage(value),
            ratio,
        })
        .collect()
}

/// Category bars sorted by category name.
#[must_use]
pub fn category_bars(categories: &CategoryCounts) -> Vec<CategoryBar> {
    let bar_ratios = ratios(&counts_as_f64(categories.values().copied()));
    categories
        .iter()
        .zip(bar_ratios)
        .map(|((name, count), ratio)| CategoryBar {
            name: name.clone(),
            count: *count,
            ratio,
        })
        .collect()
}

/// Summary cards in display order.
#[must_use]
pub fn summary_cards(summary: &StatsSummary) -> Vec<SummaryCard> {
    vec![
        SummaryCard::new("Всего проверено", summary.total_reviewed.to_string()),
        SummaryCard::new("Сегодня", summary.total_reviewed_today.to_string()),
        SummaryCard::new("За неделю", summary.total_reviewed_this_week.to_string()),
        SummaryCard::new("За месяц", summary.total_reviewed_this_month.to_string()),
        SummaryCard::new("Одобрено", format_percentage(summary.approved_percentage)),
        SummaryCard::new("Отклонено", format_percentage(summary.rejected_percentage)),
        SummaryCard::new("На доработку", format_percentage(summary.request_changes_percentage)),
        SummaryCard::new("Среднее время проверки", format_duration(summary.average_review_time)),
    ]
}

fn period_label(period: &StatsPeriod) -> String {
    match period {
        StatsPeriod::Custom { start, end } => format!(
            "{} с {} по {}",
            period.label(),
            start.format("%d.%m.%Y"),
            end.format("%d.%m.%Y")
        ),
        _ => period.label().to_string(),
    }
}

/// Computes the statistics view model for `period`.
#[must_use]
pub fn compute_viewmodel(period: &StatsPeriod, data: &StatsData) -> StatsViewModel {
    StatsViewModel {
        period: period_label(period),
        cards: summary_cards(&data.summary),
        activity: activity_bars(&data.activity),
        decisions: decision_slices(&data.decisions),
        categories: category_bars(&data.categories),
        banner: None,
        loading: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32, approved: u64, rejected: u64, request_changes: u64) -> ActivityData {
        ActivityData {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            approved,
            rejected,
            request_changes,
        }
    }

    #[test]
    fn ratios_use_the_bucket_maximum() {
        assert_eq!(ratios(&[5.0, 10.0, 0.0]), vec![50.0, 100.0, 0.0]);
        assert_eq!(ratios(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(ratios(&[]).is_empty());
    }

    #[test]
    fn activity_bars_are_relative_to_busiest_day() {
        let bars = activity_bars(&[day(15, 5, 2, 1), day(16, 2, 1, 1)]);
        assert_eq!(bars[0].label, "15.01");
        assert_eq!(bars[0].total, 8);
        assert!((bars[0].ratio - 100.0).abs() < f64::EPSILON);
        assert!((bars[1].ratio - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_activity_produces_no_bars() {
        assert!(activity_bars(&[]).is_empty());
        let idle = activity_bars(&[day(1, 0, 0, 0)]);
        assert!(idle[0].ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn decision_slices_format_shares() {
        let slices = decision_slices(&DecisionsData {
            approved: 72.34,
            rejected: 18.0,
            request_changes: 9.66,
        });
        let shares: Vec<&str> = slices.iter().map(|s| s.share.as_str()).collect();
        assert_eq!(shares, vec!["72.3%", "18.0%", "9.7%"]);
        assert!((slices[0].ratio - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn categories_are_sorted_by_name() {
        let counts = CategoryCounts::from([
            ("Транспорт".to_string(), 10),
            ("Авто".to_string(), 5),
            ("Мебель".to_string(), 0),
        ]);
        let bars = category_bars(&counts);
        let names: Vec<&str> = bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Авто", "Мебель", "Транспорт"]);
        assert!((bars[0].ratio - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_cards_format_time_and_percentages() {
        let cards = summary_cards(&StatsSummary {
            total_reviewed: 120,
            total_reviewed_today: 4,
            total_reviewed_this_week: 30,
            total_reviewed_this_month: 120,
            approved_percentage: 66.666,
            rejected_percentage: 20.0,
            request_changes_percentage: 13.334,
            average_review_time: 95.0,
        });
        assert_eq!(cards[4].value, "66.7%");
        assert_eq!(cards[7].value, "1м 35с");
    }

    #[test]
    fn fractional_review_time_is_floored_to_seconds() {
        assert_eq!(format_duration(156.4), "2м 36с");
        assert_eq!(format_duration(59.99), "0м 59с");
        assert_eq!(format_duration(-3.0), "0м 0с");
        assert_eq!(format_duration(f64::NAN), "0м 0с");
    }

    #[test]
    fn custom_period_label_names_the_range() {
        let period = StatsPeriod::Custom {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert_eq!(period_label(&period), "Произвольный период с 01.01.2024 по 31.01.2024");
        assert_eq!(period_label(&StatsPeriod::Week), "Последние 7 дней");
    }
}
