//! Dashboard and budget summary generation.
//!
//! The computations here are pure functions over loaded rows. The section list, the
//! category list and the event dates are passed in through [`SummarySettings`], and
//! `today` is injected, so both storage backends produce identical numbers. The
//! contribution total always comes from the ledger rather than the cached per-attendee
//! totals.

use crate::{
    entities::{
        AttendingStatus, BudgetItem, Contribution, Expense, PaidStatus, attendee, budget_item,
        contribution, expense,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QuerySelect, prelude::*};
use serde::Serialize;

/// Vocabulary and dates the summaries are computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySettings {
    /// Section codes to break attendee counts down by
    pub sections: Vec<String>,
    /// Categories to break the budget down by
    pub categories: Vec<String>,
    /// Reunion date
    pub target_date: NaiveDate,
    /// Length of the planning campaign in days
    pub campaign_days: i64,
}

/// Attendee counts by attendance and payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: u64,
    pub attending: u64,
    pub not_attending: u64,
    pub not_confirmed: u64,
    pub paid: u64,
    pub pending: u64,
    pub not_paid: u64,
    pub not_applicable: u64,
}

impl StatusCounts {
    /// Counts one attendee.
    pub fn record(&mut self, attendee: &attendee::Model) {
        self.total += 1;
        match attendee.attending_status {
            AttendingStatus::Attending => self.attending += 1,
            AttendingStatus::NotAttending => self.not_attending += 1,
            AttendingStatus::NotConfirmed => self.not_confirmed += 1,
        }
        match attendee.paid_status {
            PaidStatus::Paid => self.paid += 1,
            PaidStatus::Pending => self.pending += 1,
            PaidStatus::NotPaid => self.not_paid += 1,
            PaidStatus::NotApplicable => self.not_applicable += 1,
        }
    }

    /// Counts every attendee in `attendees`.
    pub fn tally<'a>(attendees: impl IntoIterator<Item = &'a attendee::Model>) -> Self {
        let mut counts = Self::default();
        for attendee in attendees {
            counts.record(attendee);
        }
        counts
    }
}

/// Counts for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub section: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Event-wide snapshot for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Counts across all attendees
    #[serde(flatten)]
    pub counts: StatusCounts,
    /// Counts per configured section
    pub sections: Vec<SectionSummary>,
    /// Sum of the contribution ledger
    pub total_contributions: i64,
    /// Sum of all expenses
    pub total_expenses: i64,
    /// Sum of all budget estimates
    pub total_budget: i64,
    /// Expenses as a percentage of the budget
    pub budget_utilization: i64,
    /// Whole days until the reunion, never negative
    pub days_remaining: i64,
    /// How far through the campaign we are, 0-100
    pub progress_percentage: i64,
}

/// Planned vs actual spend for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub estimated_amount: i64,
    pub actual_amount: i64,
}

/// Planned vs actual spend across the configured categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: i64,
    pub total_expenses: i64,
    pub total_contributions: i64,
    /// Contributions minus expenses
    pub balance: i64,
    pub category_breakdown: Vec<CategoryBreakdown>,
}

/// Rounds `numerator / denominator × 100` to the nearest whole percent.
///
/// Returns 0 when the denominator is not positive.
#[must_use]
pub fn percentage(numerator: i64, denominator: i64) -> i64 {
    if denominator <= 0 {
        return 0;
    }
    // Round half away from zero using integer arithmetic
    let scaled = i128::from(numerator) * 100;
    let denominator = i128::from(denominator);
    let rounded = if scaled >= 0 {
        (scaled * 2 + denominator) / (denominator * 2)
    } else {
        (scaled * 2 - denominator) / (denominator * 2)
    };
    i64::try_from(rounded).unwrap_or(i64::MAX)
}

/// Expenses as a whole percentage of the budget; 0 when there is no budget.
#[must_use]
pub fn budget_utilization(total_expenses: i64, total_budget: i64) -> i64 {
    percentage(total_expenses, total_budget)
}

/// Calendar days from `today` until `target_date`, never negative.
#[must_use]
pub fn days_remaining(target_date: NaiveDate, today: NaiveDate) -> i64 {
    (target_date - today).num_days().max(0)
}

/// Share of the campaign already elapsed, clamped to 0-100.
#[must_use]
pub fn progress_percentage(days_remaining: i64, campaign_days: i64) -> i64 {
    percentage(campaign_days - days_remaining, campaign_days).clamp(0, 100)
}

/// Builds the dashboard snapshot from loaded rows and totals.
#[must_use]
pub fn compute_dashboard(
    attendees: &[attendee::Model],
    total_contributions: i64,
    total_expenses: i64,
    total_budget: i64,
    settings: &SummarySettings,
    today: NaiveDate,
) -> DashboardSummary {
    let sections = settings
        .sections
        .iter()
        .map(|section| SectionSummary {
            section: section.clone(),
            counts: StatusCounts::tally(attendees.iter().filter(|a| &a.section == section)),
        })
        .collect();

    let days_remaining = days_remaining(settings.target_date, today);

    DashboardSummary {
        counts: StatusCounts::tally(attendees),
        sections,
        total_contributions,
        total_expenses,
        total_budget,
        budget_utilization: budget_utilization(total_expenses, total_budget),
        days_remaining,
        progress_percentage: progress_percentage(days_remaining, settings.campaign_days),
    }
}

/// Builds the budget snapshot from loaded rows.
///
/// Only the configured categories appear in the breakdown; the global totals still
/// cover every row.
#[must_use]
pub fn compute_budget_summary(
    budget_items: &[budget_item::Model],
    expenses: &[expense::Model],
    total_contributions: i64,
    categories: &[String],
) -> BudgetSummary {
    let total_budget = budget_items.iter().map(|b| b.estimated_amount).sum();
    let total_expenses = expenses.iter().map(|e| e.amount).sum();

    let category_breakdown = categories
        .iter()
        .map(|category| CategoryBreakdown {
            category: category.clone(),
            estimated_amount: budget_items
                .iter()
                .filter(|b| &b.category == category)
                .map(|b| b.estimated_amount)
                .sum(),
            actual_amount: expenses
                .iter()
                .filter(|e| &e.category == category)
                .map(|e| e.amount)
                .sum(),
        })
        .collect();

    BudgetSummary {
        total_budget,
        total_expenses,
        total_contributions,
        balance: total_contributions - total_expenses,
        category_breakdown,
    }
}

/// `SELECT SUM(column)` over a whole table; 0 for an empty table.
async fn column_total<E, C>(db: &C, column: E::Column) -> Result<i64>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = E::find()
        .select_only()
        .column_as(column.sum(), "total")
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Sum of the whole contribution ledger.
pub async fn total_contributions<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    column_total::<Contribution, C>(db, contribution::Column::Amount).await
}

/// Loads the rows and computes the dashboard snapshot.
pub async fn get_dashboard_summary(
    db: &DatabaseConnection,
    settings: &SummarySettings,
    today: NaiveDate,
) -> Result<DashboardSummary> {
    let attendees = attendee::Entity::find().all(db).await?;
    let total_contributions = total_contributions(db).await?;
    let total_expenses = column_total::<Expense, _>(db, expense::Column::Amount).await?;
    let total_budget =
        column_total::<BudgetItem, _>(db, budget_item::Column::EstimatedAmount).await?;

    Ok(compute_dashboard(
        &attendees,
        total_contributions,
        total_expenses,
        total_budget,
        settings,
        today,
    ))
}

/// Loads the rows and computes the budget snapshot.
pub async fn get_budget_summary(
    db: &DatabaseConnection,
    settings: &SummarySettings,
) -> Result<BudgetSummary> {
    let budget_items = BudgetItem::find().all(db).await?;
    let expenses = Expense::find().all(db).await?;
    let total_contributions = total_contributions(db).await?;

    Ok(compute_budget_summary(
        &budget_items,
        &expenses,
        total_contributions,
        &settings.categories,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn settings() -> SummarySettings {
        SummarySettings {
            sections: ["A", "B", "C", "D"].map(String::from).to_vec(),
            categories: ["venue", "food", "gifts"].map(String::from).to_vec(),
            target_date: date(2026, 12, 26),
            campaign_days: 365,
        }
    }

    #[test]
    fn test_percentage_rounding_and_zero_guard() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 200), 1); // 0.5% rounds up
        assert_eq!(percentage(500, 1000), 50);
        assert_eq!(percentage(1500, 1000), 150);
        assert_eq!(budget_utilization(400, 0), 0);
    }

    #[test]
    fn test_days_remaining_is_clamped() {
        let target = date(2026, 12, 26);
        assert_eq!(days_remaining(target, date(2026, 12, 16)), 10);
        assert_eq!(days_remaining(target, target), 0);
        assert_eq!(days_remaining(target, date(2027, 1, 2)), 0);
    }

    #[test]
    fn test_progress_percentage_bounds() {
        assert_eq!(progress_percentage(365, 365), 0);
        assert_eq!(progress_percentage(0, 365), 100);
        assert_eq!(progress_percentage(500, 365), 0);
        assert_eq!(progress_percentage(73, 365), 80);
    }

    #[test]
    fn test_budget_breakdown_by_category() {
        let items = vec![budget_item_row(1, "venue", 1000), budget_item_row(2, "custom", 50)];
        let expenses = vec![expense_row(1, "venue", 400), expense_row(2, "custom", 20)];

        let summary = compute_budget_summary(&items, &expenses, 900, &settings().categories);

        assert_eq!(
            summary.category_breakdown[0],
            CategoryBreakdown {
                category: "venue".to_string(),
                estimated_amount: 1000,
                actual_amount: 400,
            }
        );
        assert_eq!(
            summary.category_breakdown[1],
            CategoryBreakdown {
                category: "food".to_string(),
                estimated_amount: 0,
                actual_amount: 0,
            }
        );
        // Unlisted categories are left out of the breakdown but counted in totals
        assert_eq!(summary.category_breakdown.len(), 3);
        assert_eq!(summary.total_budget, 1050);
        assert_eq!(summary.total_expenses, 420);
        assert_eq!(summary.balance, 480);
    }

    #[test]
    fn test_dashboard_counts_per_section() {
        let mut ana = attendee_row(1, "A");
        ana.attending_status = AttendingStatus::Attending;
        ana.paid_status = PaidStatus::Paid;
        let ben = attendee_row(2, "B");
        let mut cora = attendee_row(3, "B");
        cora.paid_status = PaidStatus::Pending;
        let stray = attendee_row(4, "Z");

        let summary = compute_dashboard(
            &[ana, ben, cora, stray],
            700,
            300,
            1200,
            &settings(),
            date(2026, 12, 16),
        );

        assert_eq!(summary.counts.total, 4);
        assert_eq!(summary.counts.attending, 1);
        assert_eq!(summary.counts.not_confirmed, 3);
        assert_eq!(summary.counts.paid, 1);
        assert_eq!(summary.counts.pending, 1);
        assert_eq!(summary.counts.not_paid, 2);
        assert_eq!(summary.sections.len(), 4);
        assert_eq!(summary.sections[1].section, "B");
        assert_eq!(summary.sections[1].counts.total, 2);
        assert_eq!(summary.sections[3].counts.total, 0);
        assert_eq!(summary.budget_utilization, 25);
        assert_eq!(summary.days_remaining, 10);
        assert_eq!(summary.progress_percentage, 97);
    }

    #[test]
    fn test_dashboard_serializes_flat_counts() {
        let summary = compute_dashboard(&[], 0, 0, 0, &settings(), date(2026, 1, 1));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["budgetUtilization"], 0);
        assert_eq!(json["sections"][0]["section"], "A");
        assert_eq!(json["sections"][0]["notPaid"], 0);
    }

    #[tokio::test]
    async fn test_summaries_from_database() -> Result<()> {
        let (db, attendee) = setup_with_attendee().await?;
        create_test_contribution(&db, attendee.id, 500).await?;
        create_test_contribution(&db, attendee.id, 300).await?;
        create_test_expense(&db, "venue", 400).await?;
        create_test_budget_item(&db, "venue", 1000).await?;

        let dashboard = get_dashboard_summary(&db, &settings(), date(2026, 12, 1)).await?;
        assert_eq!(dashboard.total_contributions, 800);
        assert_eq!(dashboard.total_expenses, 400);
        assert_eq!(dashboard.total_budget, 1000);
        assert_eq!(dashboard.budget_utilization, 40);
        assert_eq!(dashboard.counts.paid, 1);

        let budget = get_budget_summary(&db, &settings()).await?;
        assert_eq!(budget.total_contributions, 800);
        assert_eq!(budget.balance, 400);
        assert_eq!(budget.category_breakdown[0].estimated_amount, 1000);
        assert_eq!(budget.category_breakdown[0].actual_amount, 400);
        Ok(())
    }

    #[tokio::test]
    async fn test_summaries_on_empty_database() -> Result<()> {
        let db = setup_test_db().await?;
        let dashboard = get_dashboard_summary(&db, &settings(), date(2026, 12, 1)).await?;
        assert_eq!(dashboard.total_contributions, 0);
        assert_eq!(dashboard.budget_utilization, 0);
        Ok(())
    }
}
