//! `SQLite` backend - thin delegation to the `core` operations.

use super::Repository;
use crate::{
    core::{
        attendee, budget, category, contribution,
        contribution::TotalDrift,
        expense,
        import::{self, ImportReport},
        summary::{self, BudgetSummary, DashboardSummary, SummarySettings},
        user,
    },
    entities::{self, CategoryType},
    errors::Result,
    models::{
        AttendeeChanges, AttendeeFilter, BudgetItemChanges, CategoryChanges, ContributionChanges,
        ContributionFilter, ExpenseChanges, LoginChanges, NewAttendee, NewBudgetItem, NewCategory,
        NewExpense, NewUser,
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Repository over a `SeaORM` connection.
#[derive(Debug)]
pub struct SeaOrmRepository {
    db: DatabaseConnection,
}

impl SeaOrmRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository for SeaOrmRepository {
    async fn create_attendee(&self, new: NewAttendee) -> Result<entities::attendee::Model> {
        attendee::create_attendee(&self.db, new).await
    }

    async fn get_attendee(&self, attendee_id: i64) -> Result<Option<entities::attendee::Model>> {
        attendee::get_attendee(&self.db, attendee_id).await
    }

    async fn get_attendee_by_mobile(
        &self,
        mobile: &str,
    ) -> Result<Option<entities::attendee::Model>> {
        attendee::get_attendee_by_mobile(&self.db, mobile).await
    }

    async fn list_attendees(
        &self,
        filter: &AttendeeFilter,
    ) -> Result<Vec<entities::attendee::Model>> {
        attendee::list_attendees(&self.db, filter).await
    }

    async fn update_attendee(
        &self,
        attendee_id: i64,
        changes: AttendeeChanges,
    ) -> Result<Option<entities::attendee::Model>> {
        attendee::update_attendee(&self.db, attendee_id, changes).await
    }

    async fn delete_attendee(&self, attendee_id: i64) -> Result<bool> {
        attendee::delete_attendee(&self.db, attendee_id).await
    }

    async fn bulk_import_attendees(&self, records: Vec<NewAttendee>) -> Result<ImportReport> {
        import::bulk_import_attendees(&self.db, records).await
    }

    async fn create_contribution(
        &self,
        attendee_id: i64,
        amount: i64,
        date: NaiveDate,
        recorded_by: Option<i64>,
    ) -> Result<entities::contribution::Model> {
        contribution::create_contribution(&self.db, attendee_id, amount, date, recorded_by).await
    }

    async fn get_contribution(
        &self,
        contribution_id: i64,
    ) -> Result<Option<entities::contribution::Model>> {
        contribution::get_contribution(&self.db, contribution_id).await
    }

    async fn update_contribution(
        &self,
        contribution_id: i64,
        changes: ContributionChanges,
    ) -> Result<Option<entities::contribution::Model>> {
        contribution::update_contribution(&self.db, contribution_id, changes).await
    }

    async fn delete_contribution(&self, contribution_id: i64) -> Result<bool> {
        contribution::delete_contribution(&self.db, contribution_id).await
    }

    async fn list_contributions(
        &self,
        filter: &ContributionFilter,
    ) -> Result<Vec<entities::contribution::Model>> {
        contribution::list_contributions(&self.db, filter).await
    }

    async fn reconcile_contribution_totals(&self) -> Result<Vec<TotalDrift>> {
        contribution::reconcile_contribution_totals(&self.db).await
    }

    async fn create_expense(
        &self,
        new: NewExpense,
        created_by: Option<i64>,
    ) -> Result<entities::expense::Model> {
        expense::create_expense(&self.db, new, created_by).await
    }

    async fn get_expense(&self, expense_id: i64) -> Result<Option<entities::expense::Model>> {
        expense::get_expense(&self.db, expense_id).await
    }

    async fn list_expenses(&self, category: Option<&str>) -> Result<Vec<entities::expense::Model>> {
        expense::list_expenses(&self.db, category).await
    }

    async fn update_expense(
        &self,
        expense_id: i64,
        changes: ExpenseChanges,
    ) -> Result<Option<entities::expense::Model>> {
        expense::update_expense(&self.db, expense_id, changes).await
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<bool> {
        expense::delete_expense(&self.db, expense_id).await
    }

    async fn create_budget_item(&self, new: NewBudgetItem) -> Result<entities::budget_item::Model> {
        budget::create_budget_item(&self.db, new).await
    }

    async fn get_budget_item(&self, item_id: i64) -> Result<Option<entities::budget_item::Model>> {
        budget::get_budget_item(&self.db, item_id).await
    }

    async fn list_budget_items(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<entities::budget_item::Model>> {
        budget::list_budget_items(&self.db, category).await
    }

    async fn update_budget_item(
        &self,
        item_id: i64,
        changes: BudgetItemChanges,
    ) -> Result<Option<entities::budget_item::Model>> {
        budget::update_budget_item(&self.db, item_id, changes).await
    }

    async fn delete_budget_item(&self, item_id: i64) -> Result<bool> {
        budget::delete_budget_item(&self.db, item_id).await
    }

    async fn create_category(&self, new: NewCategory) -> Result<entities::category::Model> {
        category::create_category(&self.db, new).await
    }

    async fn list_categories(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<entities::category::Model>> {
        category::list_categories(&self.db, category_type).await
    }

    async fn update_category(
        &self,
        category_id: i64,
        changes: CategoryChanges,
    ) -> Result<Option<entities::category::Model>> {
        category::update_category(&self.db, category_id, changes).await
    }

    async fn delete_category(&self, category_id: i64) -> Result<bool> {
        category::delete_category(&self.db, category_id).await
    }

    async fn seed_categories(&self, names: &[String]) -> Result<usize> {
        category::seed_categories(&self.db, names).await
    }

    async fn create_user(&self, new: NewUser) -> Result<entities::user::Model> {
        user::create_user(&self.db, new).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<entities::user::Model>> {
        user::get_user(&self.db, user_id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<entities::user::Model>> {
        user::find_user_by_username(&self.db, username).await
    }

    async fn find_user_by_attendee(
        &self,
        attendee_id: i64,
    ) -> Result<Option<entities::user::Model>> {
        user::find_user_by_attendee(&self.db, attendee_id).await
    }

    async fn update_user_login(
        &self,
        user_id: i64,
        changes: LoginChanges,
    ) -> Result<Option<entities::user::Model>> {
        user::update_user_login(&self.db, user_id, changes).await
    }

    async fn list_users(&self) -> Result<Vec<entities::user::Model>> {
        user::list_users(&self.db).await
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool> {
        user::delete_user(&self.db, user_id).await
    }

    async fn get_dashboard_summary(
        &self,
        settings: &SummarySettings,
        today: NaiveDate,
    ) -> Result<DashboardSummary> {
        summary::get_dashboard_summary(&self.db, settings, today).await
    }

    async fn get_budget_summary(&self, settings: &SummarySettings) -> Result<BudgetSummary> {
        summary::get_budget_summary(&self.db, settings).await
    }
}
