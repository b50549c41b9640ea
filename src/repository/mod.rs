//! Storage capability used by the HTTP layer.
//!
//! [`Repository`] is implemented twice: [`SeaOrmRepository`] persists to `SQLite`
//! through `SeaORM`, and [`MemoryRepository`] keeps everything in process memory for
//! development and tests. Both apply the same ledger rules, orderings and summary
//! computations. The backend is picked once at start-up by [`open_repository`].

mod memory;
mod sea;

pub use memory::MemoryRepository;
pub use sea::SeaOrmRepository;

use crate::{
    config::{AppConfig, StorageBackend, database},
    core::{
        contribution::TotalDrift,
        import::ImportReport,
        summary::{BudgetSummary, DashboardSummary, SummarySettings},
    },
    entities::{CategoryType, attendee, budget_item, category, contribution, expense, user},
    errors::Result,
    models::{
        AttendeeChanges, AttendeeFilter, BudgetItemChanges, CategoryChanges, ContributionChanges,
        ContributionFilter, ExpenseChanges, LoginChanges, NewAttendee, NewBudgetItem, NewCategory,
        NewExpense, NewUser,
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Every persistent operation the application performs.
///
/// "Not found" on update and delete is an absent result (`Ok(None)` / `Ok(false)`),
/// not an error; store failures are errors.
#[async_trait]
pub trait Repository: Send + Sync {
    // Attendees
    async fn create_attendee(&self, new: NewAttendee) -> Result<attendee::Model>;
    async fn get_attendee(&self, attendee_id: i64) -> Result<Option<attendee::Model>>;
    async fn get_attendee_by_mobile(&self, mobile: &str) -> Result<Option<attendee::Model>>;
    async fn list_attendees(&self, filter: &AttendeeFilter) -> Result<Vec<attendee::Model>>;
    async fn update_attendee(
        &self,
        attendee_id: i64,
        changes: AttendeeChanges,
    ) -> Result<Option<attendee::Model>>;
    async fn delete_attendee(&self, attendee_id: i64) -> Result<bool>;
    async fn bulk_import_attendees(&self, records: Vec<NewAttendee>) -> Result<ImportReport>;

    // Contribution ledger
    async fn create_contribution(
        &self,
        attendee_id: i64,
        amount: i64,
        date: NaiveDate,
        recorded_by: Option<i64>,
    ) -> Result<contribution::Model>;
    async fn get_contribution(&self, contribution_id: i64) -> Result<Option<contribution::Model>>;
    async fn update_contribution(
        &self,
        contribution_id: i64,
        changes: ContributionChanges,
    ) -> Result<Option<contribution::Model>>;
    async fn delete_contribution(&self, contribution_id: i64) -> Result<bool>;
    async fn list_contributions(
        &self,
        filter: &ContributionFilter,
    ) -> Result<Vec<contribution::Model>>;
    async fn reconcile_contribution_totals(&self) -> Result<Vec<TotalDrift>>;

    // Expenses
    async fn create_expense(
        &self,
        new: NewExpense,
        created_by: Option<i64>,
    ) -> Result<expense::Model>;
    async fn get_expense(&self, expense_id: i64) -> Result<Option<expense::Model>>;
    async fn list_expenses(&self, category: Option<&str>) -> Result<Vec<expense::Model>>;
    async fn update_expense(
        &self,
        expense_id: i64,
        changes: ExpenseChanges,
    ) -> Result<Option<expense::Model>>;
    async fn delete_expense(&self, expense_id: i64) -> Result<bool>;

    // Budget items
    async fn create_budget_item(&self, new: NewBudgetItem) -> Result<budget_item::Model>;
    async fn get_budget_item(&self, item_id: i64) -> Result<Option<budget_item::Model>>;
    async fn list_budget_items(&self, category: Option<&str>) -> Result<Vec<budget_item::Model>>;
    async fn update_budget_item(
        &self,
        item_id: i64,
        changes: BudgetItemChanges,
    ) -> Result<Option<budget_item::Model>>;
    async fn delete_budget_item(&self, item_id: i64) -> Result<bool>;

    // Categories
    async fn create_category(&self, new: NewCategory) -> Result<category::Model>;
    async fn list_categories(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<category::Model>>;
    async fn update_category(
        &self,
        category_id: i64,
        changes: CategoryChanges,
    ) -> Result<Option<category::Model>>;
    async fn delete_category(&self, category_id: i64) -> Result<bool>;
    async fn seed_categories(&self, names: &[String]) -> Result<usize>;

    // Users
    async fn create_user(&self, new: NewUser) -> Result<user::Model>;
    async fn get_user(&self, user_id: i64) -> Result<Option<user::Model>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>>;
    async fn find_user_by_attendee(&self, attendee_id: i64) -> Result<Option<user::Model>>;
    async fn update_user_login(
        &self,
        user_id: i64,
        changes: LoginChanges,
    ) -> Result<Option<user::Model>>;
    async fn list_users(&self) -> Result<Vec<user::Model>>;
    async fn delete_user(&self, user_id: i64) -> Result<bool>;

    // Summaries
    async fn get_dashboard_summary(
        &self,
        settings: &SummarySettings,
        today: NaiveDate,
    ) -> Result<DashboardSummary>;
    async fn get_budget_summary(&self, settings: &SummarySettings) -> Result<BudgetSummary>;
}

/// Opens the backend named in `[storage]`.
///
/// For `SQLite` this connects to `DATABASE_URL` and creates any missing tables.
pub async fn open_repository(config: &AppConfig) -> Result<Arc<dyn Repository>> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db = database::create_connection().await?;
            database::create_tables(&db).await?;
            info!("Using SQLite storage backend");
            Ok(Arc::new(SeaOrmRepository::new(db)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage backend; data is lost on restart");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour both backends must agree on.
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::PaidStatus;
    use crate::errors::Error;
    use crate::test_utils::{new_attendee, setup_test_db, test_date};

    async fn backends() -> Vec<(&'static str, Box<dyn Repository>)> {
        vec![
            (
                "sqlite",
                Box::new(SeaOrmRepository::new(setup_test_db().await.unwrap())),
            ),
            ("memory", Box::new(MemoryRepository::new())),
        ]
    }

    async fn cached_total(repo: &dyn Repository, attendee_id: i64) -> i64 {
        repo.get_attendee(attendee_id)
            .await
            .unwrap()
            .unwrap()
            .contribution_amount
    }

    #[tokio::test]
    async fn test_ledger_scenario_on_every_backend() -> Result<()> {
        for (name, repo) in backends().await {
            let repo = repo.as_ref();
            let ana = repo
                .create_attendee(new_attendee("Ana", "A", "0917000001"))
                .await?;

            let first = repo
                .create_contribution(ana.id, 500, test_date(1), Some(1))
                .await?;
            let after_first = repo.get_attendee(ana.id).await?.unwrap();
            assert_eq!(after_first.contribution_amount, 500, "{name}");
            assert_eq!(after_first.paid_status, PaidStatus::Paid, "{name}");

            let second = repo
                .create_contribution(ana.id, 300, test_date(2), Some(1))
                .await?;
            assert_eq!(cached_total(repo, ana.id).await, 800, "{name}");

            repo.update_contribution(
                first.id,
                ContributionChanges {
                    amount: Some(700),
                    date: None,
                },
            )
            .await?;
            assert_eq!(cached_total(repo, ana.id).await, 1000, "{name}");

            assert!(repo.delete_contribution(second.id).await?, "{name}");
            assert_eq!(cached_total(repo, ana.id).await, 700, "{name}");

            let ledger: i64 = repo
                .list_contributions(&ContributionFilter {
                    attendee_id: Some(ana.id),
                    ..Default::default()
                })
                .await?
                .iter()
                .map(|c| c.amount)
                .sum();
            assert_eq!(ledger, 700, "{name}");
            assert_eq!(
                repo.get_attendee(ana.id).await?.unwrap().paid_status,
                PaidStatus::Paid,
                "{name}"
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_semantics_on_every_backend() -> Result<()> {
        for (name, repo) in backends().await {
            let missing_attendee = repo.create_contribution(404, 10, test_date(1), None).await;
            assert!(
                matches!(missing_attendee, Err(Error::NotFound { .. })),
                "{name}"
            );
            let invalid = repo.create_contribution(404, 0, test_date(1), None).await;
            assert!(
                matches!(invalid, Err(Error::InvalidAmount { amount: 0 })),
                "{name}"
            );
            assert!(
                repo.update_contribution(404, ContributionChanges::default())
                    .await?
                    .is_none(),
                "{name}"
            );
            assert!(!repo.delete_contribution(404).await?, "{name}");
            assert!(!repo.delete_attendee(404).await?, "{name}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal_on_every_backend() -> Result<()> {
        for (name, repo) in backends().await {
            repo.create_attendee(new_attendee("Ana", "A", "0917000001"))
                .await?;
            repo.create_attendee(new_attendee("Jo_Ann", "A", "0917000002"))
                .await?;
            repo.create_attendee(new_attendee("100%Ben", "B", "0917000003"))
                .await?;

            let search = |needle: &str| AttendeeFilter {
                search: Some(needle.to_string()),
                ..Default::default()
            };
            let names = |found: Vec<attendee::Model>| -> Vec<String> {
                found.into_iter().map(|a| a.first_name).collect()
            };
            assert_eq!(names(repo.list_attendees(&search("_")).await?), vec!["Jo_Ann"], "{name}");
            assert_eq!(names(repo.list_attendees(&search("%")).await?), vec!["100%Ben"], "{name}");
            assert_eq!(names(repo.list_attendees(&search("o_a")).await?), vec!["Jo_Ann"], "{name}");
            assert!(repo.list_attendees(&search("A_a")).await?.is_empty(), "{name}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_contribution_order_matches_across_backends() -> Result<()> {
        for (name, repo) in backends().await {
            let ana = repo
                .create_attendee(new_attendee("Ana", "A", "0917000001"))
                .await?;
            let old = repo.create_contribution(ana.id, 10, test_date(1), None).await?;
            let newest = repo.create_contribution(ana.id, 20, test_date(20), None).await?;
            let middle = repo.create_contribution(ana.id, 30, test_date(10), None).await?;

            let ids: Vec<i64> = repo
                .list_contributions(&ContributionFilter::default())
                .await?
                .iter()
                .map(|c| c.id)
                .collect();
            assert_eq!(ids, vec![newest.id, middle.id, old.id], "{name}");

            let page: Vec<i64> = repo
                .list_contributions(&ContributionFilter {
                    limit: Some(1),
                    offset: Some(1),
                    ..Default::default()
                })
                .await?
                .iter()
                .map(|c| c.id)
                .collect();
            assert_eq!(page, vec![middle.id], "{name}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_summaries_match_across_backends() -> Result<()> {
        let settings = crate::config::AppConfig::default().event.summary_settings();
        let today = test_date(15);
        let mut dashboards = Vec::new();
        let mut budgets = Vec::new();

        for (_, repo) in backends().await {
            let ana = repo
                .create_attendee(new_attendee("Ana", "A", "0917000001"))
                .await?;
            repo.create_attendee(new_attendee("Ben", "B", "0917000002"))
                .await?;
            repo.create_contribution(ana.id, 250, test_date(2), None)
                .await?;
            repo.create_expense(
                NewExpense {
                    title: "Deposit".to_string(),
                    description: None,
                    category: "venue".to_string(),
                    amount: 100,
                    date: test_date(3),
                    receipt: None,
                },
                None,
            )
            .await?;
            repo.create_budget_item(NewBudgetItem {
                name: "Hall".to_string(),
                description: None,
                category: "venue".to_string(),
                estimated_amount: 400,
            })
            .await?;

            dashboards.push(repo.get_dashboard_summary(&settings, today).await?);
            budgets.push(repo.get_budget_summary(&settings).await?);
        }

        assert_eq!(dashboards[0], dashboards[1]);
        assert_eq!(budgets[0], budgets[1]);
        assert_eq!(dashboards[0].total_contributions, 250);
        assert_eq!(dashboards[0].budget_utilization, 25);
        assert_eq!(budgets[0].balance, 150);
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_import_on_every_backend() -> Result<()> {
        for (name, repo) in backends().await {
            let existing = repo
                .create_attendee(new_attendee("Ana", "A", "0917000001"))
                .await?;

            let report = repo
                .bulk_import_attendees(vec![
                    new_attendee("Anabel", "B", "0917000001"),
                    new_attendee("Carl", "C", "0917000003"),
                    new_attendee("", "C", "0917000004"),
                ])
                .await?;

            assert_eq!(report.updated, 1, "{name}");
            assert_eq!(report.created, 1, "{name}");
            assert_eq!(report.failures.len(), 1, "{name}");
            assert_eq!(report.attendees[0].id, existing.id, "{name}");
            assert_eq!(report.attendees[0].section, "B", "{name}");
            assert_ne!(report.attendees[1].id, existing.id, "{name}");
        }
        Ok(())
    }
}
