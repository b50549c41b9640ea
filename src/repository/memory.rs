//! In-memory backend.
//!
//! All tables sit behind one `tokio` `RwLock`. Every write operation takes the write
//! lock once, so a ledger change and the matching cached-total change are applied
//! together and no reader sees one without the other.

use super::Repository;
use crate::{
    core::{
        attendee::{optional_text, require_text},
        budget::require_estimate,
        contribution::TotalDrift,
        expense::require_positive,
        import::{ImportReport, Upserted},
        summary::{self, BudgetSummary, DashboardSummary, SummarySettings},
    },
    entities::{
        AttendingStatus, CategoryType, PaidStatus, Role, attendee, budget_item, category,
        contribution, expense, user,
    },
    errors::{Error, Result},
    models::{
        AttendeeChanges, AttendeeFilter, BudgetItemChanges, CategoryChanges, ContributionChanges,
        ContributionFilter, ExpenseChanges, LoginChanges, NewAttendee, NewBudgetItem, NewCategory,
        NewExpense, NewUser,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Rows keyed by id, with an autoincrementing id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Inserts the row built for the next id and returns a copy of it.
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug, Default)]
struct Tables {
    attendees: Table<attendee::Model>,
    contributions: Table<contribution::Model>,
    expenses: Table<expense::Model>,
    budget_items: Table<budget_item::Model>,
    categories: Table<category::Model>,
    users: Table<user::Model>,
}

impl Tables {
    fn attendee_by_mobile(&self, mobile: &str) -> Option<&attendee::Model> {
        let mobile = mobile.trim();
        self.attendees.values().find(|a| a.mobile == mobile)
    }

    fn category_by_name(&self, name: &str) -> Option<&category::Model> {
        self.categories.values().find(|c| c.name == name)
    }

    fn user_by_username(&self, username: &str) -> Option<&user::Model> {
        let username = username.trim();
        self.users.values().find(|u| u.username == username)
    }

    fn ledger_total(&self, attendee_id: i64) -> i64 {
        self.contributions
            .values()
            .filter(|c| c.attendee_id == attendee_id)
            .map(|c| c.amount)
            .sum()
    }

    fn create_attendee(&mut self, new: NewAttendee) -> Result<attendee::Model> {
        let first_name = require_text("first name", &new.first_name)?;
        let last_name = require_text("last name", &new.last_name)?;
        let section = require_text("section", &new.section)?;
        let mobile = require_text("mobile", &new.mobile)?;

        if self.attendee_by_mobile(&mobile).is_some() {
            return Err(Error::Conflict {
                field: "mobile",
                value: mobile,
            });
        }

        let created = self.attendees.insert_with(|id| attendee::Model {
            id,
            first_name,
            last_name,
            section,
            mobile,
            email: optional_text(new.email),
            gender: optional_text(new.gender),
            occupation: optional_text(new.occupation),
            city: optional_text(new.city),
            attending_status: new
                .attending_status
                .unwrap_or(AttendingStatus::NotConfirmed),
            paid_status: new.paid_status.unwrap_or(PaidStatus::NotPaid),
            contribution_amount: 0,
            created_at: Utc::now(),
        });
        debug!(attendee_id = created.id, "Created attendee");
        Ok(created)
    }

    fn update_attendee(
        &mut self,
        attendee_id: i64,
        changes: AttendeeChanges,
    ) -> Result<Option<attendee::Model>> {
        let Some(mut updated) = self.attendees.get(attendee_id) else {
            return Ok(None);
        };

        if let Some(first_name) = changes.first_name {
            updated.first_name = require_text("first name", &first_name)?;
        }
        if let Some(last_name) = changes.last_name {
            updated.last_name = require_text("last name", &last_name)?;
        }
        if let Some(section) = changes.section {
            updated.section = require_text("section", &section)?;
        }
        if let Some(mobile) = changes.mobile {
            let mobile = require_text("mobile", &mobile)?;
            if mobile != updated.mobile {
                if self.attendee_by_mobile(&mobile).is_some() {
                    return Err(Error::Conflict {
                        field: "mobile",
                        value: mobile,
                    });
                }
                updated.mobile = mobile;
            }
        }
        if changes.email.is_some() {
            updated.email = optional_text(changes.email);
        }
        if changes.gender.is_some() {
            updated.gender = optional_text(changes.gender);
        }
        if changes.occupation.is_some() {
            updated.occupation = optional_text(changes.occupation);
        }
        if changes.city.is_some() {
            updated.city = optional_text(changes.city);
        }
        if let Some(status) = changes.attending_status {
            updated.attending_status = status;
        }
        if let Some(status) = changes.paid_status {
            updated.paid_status = status;
        }

        self.attendees.rows.insert(attendee_id, updated.clone());
        Ok(Some(updated))
    }

    fn create_category(&mut self, new: NewCategory) -> Result<category::Model> {
        let name = require_text("name", &new.name)?;
        if self.category_by_name(&name).is_some() {
            return Err(Error::Conflict {
                field: "category name",
                value: name,
            });
        }
        Ok(self.categories.insert_with(|id| category::Model {
            id,
            name,
            category_type: new.category_type,
            description: optional_text(new.description),
            created_at: Utc::now(),
        }))
    }
}

/// Repository that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_attendee(&self, new: NewAttendee) -> Result<attendee::Model> {
        self.tables.write().await.create_attendee(new)
    }

    async fn get_attendee(&self, attendee_id: i64) -> Result<Option<attendee::Model>> {
        Ok(self.tables.read().await.attendees.get(attendee_id))
    }

    async fn get_attendee_by_mobile(&self, mobile: &str) -> Result<Option<attendee::Model>> {
        Ok(self.tables.read().await.attendee_by_mobile(mobile).cloned())
    }

    async fn list_attendees(&self, filter: &AttendeeFilter) -> Result<Vec<attendee::Model>> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let tables = self.tables.read().await;
        let mut attendees: Vec<attendee::Model> = tables
            .attendees
            .values()
            .filter(|a| filter.section.as_ref().is_none_or(|s| &a.section == s))
            .filter(|a| filter.attending_status.is_none_or(|s| a.attending_status == s))
            .filter(|a| filter.paid_status.is_none_or(|s| a.paid_status == s))
            .filter(|a| {
                search.as_ref().is_none_or(|needle| {
                    [&a.first_name, &a.last_name, &a.mobile]
                        .iter()
                        .any(|field| field.to_lowercase().contains(needle))
                })
            })
            .cloned()
            .collect();

        attendees.sort_by(|a, b| {
            (&a.section, &a.last_name, &a.first_name).cmp(&(&b.section, &b.last_name, &b.first_name))
        });
        Ok(attendees)
    }

    async fn update_attendee(
        &self,
        attendee_id: i64,
        changes: AttendeeChanges,
    ) -> Result<Option<attendee::Model>> {
        self.tables
            .write()
            .await
            .update_attendee(attendee_id, changes)
    }

    async fn delete_attendee(&self, attendee_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.attendees.remove(attendee_id) {
            return Ok(false);
        }

        let before = tables.contributions.rows.len();
        tables
            .contributions
            .rows
            .retain(|_, c| c.attendee_id != attendee_id);
        let removed_contributions = before - tables.contributions.rows.len();
        tables
            .users
            .rows
            .retain(|_, u| u.attendee_id != Some(attendee_id));

        info!(attendee_id, removed_contributions, "Deleted attendee");
        Ok(true)
    }

    async fn bulk_import_attendees(&self, records: Vec<NewAttendee>) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let mut tables = self.tables.write().await;

        for (index, record) in records.into_iter().enumerate() {
            let mobile = record.mobile.clone();
            let outcome = match tables.attendee_by_mobile(&record.mobile).map(|a| a.id) {
                Some(id) => tables
                    .update_attendee(id, record.into())
                    .map(|updated| updated.map(Upserted::Updated)),
                None => tables.create_attendee(record).map(|a| Some(Upserted::Created(a))),
            };
            match outcome {
                Ok(Some(outcome)) => report.record(outcome),
                Ok(None) => report.skip(index, &mobile, "attendee vanished during import"),
                Err(e) => report.skip(index, &mobile, e.to_string()),
            }
        }

        report.log_finished();
        Ok(report)
    }

    async fn create_contribution(
        &self,
        attendee_id: i64,
        amount: i64,
        date: NaiveDate,
        recorded_by: Option<i64>,
    ) -> Result<contribution::Model> {
        if amount <= 0 {
            return Err(Error::InvalidAmount { amount });
        }

        let mut tables = self.tables.write().await;
        if tables.attendees.get(attendee_id).is_none() {
            return Err(Error::not_found("attendee", attendee_id));
        }

        let created = tables.contributions.insert_with(|id| contribution::Model {
            id,
            attendee_id,
            amount,
            date,
            recorded_by,
            created_at: Utc::now(),
        });
        let first_payment = tables
            .contributions
            .values()
            .filter(|c| c.attendee_id == attendee_id)
            .count()
            == 1;

        if let Some(attendee) = tables.attendees.rows.get_mut(&attendee_id) {
            attendee.contribution_amount += amount;
            if first_payment && attendee.paid_status != PaidStatus::Paid {
                attendee.paid_status = PaidStatus::Paid;
                debug!(attendee_id, "First contribution, marked attendee as paid");
            }
        }

        info!(
            contribution_id = created.id,
            attendee_id, amount, "Recorded contribution"
        );
        Ok(created)
    }

    async fn get_contribution(&self, contribution_id: i64) -> Result<Option<contribution::Model>> {
        Ok(self.tables.read().await.contributions.get(contribution_id))
    }

    async fn update_contribution(
        &self,
        contribution_id: i64,
        changes: ContributionChanges,
    ) -> Result<Option<contribution::Model>> {
        if let Some(amount) = changes.amount {
            if amount <= 0 {
                return Err(Error::InvalidAmount { amount });
            }
        }

        let mut tables = self.tables.write().await;
        let Some(existing) = tables.contributions.rows.get_mut(&contribution_id) else {
            return Ok(None);
        };

        let delta = changes.amount.map_or(0, |amount| amount - existing.amount);
        if let Some(amount) = changes.amount {
            existing.amount = amount;
        }
        if let Some(date) = changes.date {
            existing.date = date;
        }
        let updated = existing.clone();

        if delta != 0 {
            let attendee = tables
                .attendees
                .rows
                .get_mut(&updated.attendee_id)
                .ok_or_else(|| Error::not_found("attendee", updated.attendee_id))?;
            attendee.contribution_amount += delta;
        }

        debug!(
            contribution_id,
            attendee_id = updated.attendee_id,
            delta,
            "Updated contribution"
        );
        Ok(Some(updated))
    }

    async fn delete_contribution(&self, contribution_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.contributions.rows.remove(&contribution_id) else {
            return Ok(false);
        };

        if let Some(attendee) = tables.attendees.rows.get_mut(&existing.attendee_id) {
            if attendee.contribution_amount < existing.amount {
                warn!(
                    attendee_id = attendee.id,
                    cached = attendee.contribution_amount,
                    amount = existing.amount,
                    "Cached contribution total below deleted amount, clamping to zero"
                );
            }
            attendee.contribution_amount = (attendee.contribution_amount - existing.amount).max(0);
        }

        info!(
            contribution_id,
            attendee_id = existing.attendee_id,
            amount = existing.amount,
            "Deleted contribution"
        );
        Ok(true)
    }

    async fn list_contributions(
        &self,
        filter: &ContributionFilter,
    ) -> Result<Vec<contribution::Model>> {
        let tables = self.tables.read().await;
        let mut contributions: Vec<contribution::Model> = tables
            .contributions
            .values()
            .filter(|c| filter.attendee_id.is_none_or(|id| c.attendee_id == id))
            .filter(|c| {
                filter.section.as_ref().is_none_or(|section| {
                    tables
                        .attendees
                        .rows
                        .get(&c.attendee_id)
                        .is_some_and(|a| &a.section == section)
                })
            })
            .cloned()
            .collect();

        contributions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        if let Some(limit) = filter.limit {
            let offset = filter.offset.unwrap_or(0);
            contributions = contributions
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect();
        }
        Ok(contributions)
    }

    async fn reconcile_contribution_totals(&self) -> Result<Vec<TotalDrift>> {
        let mut tables = self.tables.write().await;

        let mut totals: HashMap<i64, i64> = HashMap::new();
        for c in tables.contributions.values() {
            *totals.entry(c.attendee_id).or_default() += c.amount;
        }

        let mut drifts = Vec::new();
        for attendee in tables.attendees.rows.values_mut() {
            let ledger = totals.get(&attendee.id).copied().unwrap_or(0);
            if attendee.contribution_amount == ledger {
                continue;
            }
            warn!(
                attendee_id = attendee.id,
                cached = attendee.contribution_amount,
                ledger,
                "Contribution total drifted from ledger, rebuilding"
            );
            drifts.push(TotalDrift {
                attendee_id: attendee.id,
                cached: attendee.contribution_amount,
                ledger,
            });
            attendee.contribution_amount = ledger;
        }

        info!(repaired = drifts.len(), "Reconciled contribution totals");
        Ok(drifts)
    }

    async fn create_expense(
        &self,
        new: NewExpense,
        created_by: Option<i64>,
    ) -> Result<expense::Model> {
        let title = require_text("title", &new.title)?;
        let category = require_text("category", &new.category)?;
        let amount = require_positive(new.amount)?;

        let created = self.tables.write().await.expenses.insert_with(|id| expense::Model {
            id,
            title,
            description: optional_text(new.description),
            category,
            amount,
            date: new.date,
            receipt: optional_text(new.receipt),
            created_by,
            created_at: Utc::now(),
        });
        debug!(expense_id = created.id, amount = created.amount, "Recorded expense");
        Ok(created)
    }

    async fn get_expense(&self, expense_id: i64) -> Result<Option<expense::Model>> {
        Ok(self.tables.read().await.expenses.get(expense_id))
    }

    async fn list_expenses(&self, category: Option<&str>) -> Result<Vec<expense::Model>> {
        let mut expenses: Vec<expense::Model> = self
            .tables
            .read()
            .await
            .expenses
            .values()
            .filter(|e| category.is_none_or(|c| e.category == c))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(expenses)
    }

    async fn update_expense(
        &self,
        expense_id: i64,
        changes: ExpenseChanges,
    ) -> Result<Option<expense::Model>> {
        let mut tables = self.tables.write().await;
        let Some(mut updated) = tables.expenses.get(expense_id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            updated.title = require_text("title", &title)?;
        }
        if changes.description.is_some() {
            updated.description = optional_text(changes.description);
        }
        if let Some(category) = changes.category {
            updated.category = require_text("category", &category)?;
        }
        if let Some(amount) = changes.amount {
            updated.amount = require_positive(amount)?;
        }
        if let Some(date) = changes.date {
            updated.date = date;
        }
        if changes.receipt.is_some() {
            updated.receipt = optional_text(changes.receipt);
        }

        tables.expenses.rows.insert(expense_id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<bool> {
        Ok(self.tables.write().await.expenses.remove(expense_id))
    }

    async fn create_budget_item(&self, new: NewBudgetItem) -> Result<budget_item::Model> {
        let name = require_text("name", &new.name)?;
        let category = require_text("category", &new.category)?;
        let estimated_amount = require_estimate(new.estimated_amount)?;

        Ok(self
            .tables
            .write()
            .await
            .budget_items
            .insert_with(|id| budget_item::Model {
                id,
                name,
                description: optional_text(new.description),
                category,
                estimated_amount,
                created_at: Utc::now(),
            }))
    }

    async fn get_budget_item(&self, item_id: i64) -> Result<Option<budget_item::Model>> {
        Ok(self.tables.read().await.budget_items.get(item_id))
    }

    async fn list_budget_items(&self, category: Option<&str>) -> Result<Vec<budget_item::Model>> {
        let mut items: Vec<budget_item::Model> = self
            .tables
            .read()
            .await
            .budget_items
            .values()
            .filter(|b| category.is_none_or(|c| b.category == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Ok(items)
    }

    async fn update_budget_item(
        &self,
        item_id: i64,
        changes: BudgetItemChanges,
    ) -> Result<Option<budget_item::Model>> {
        let mut tables = self.tables.write().await;
        let Some(mut updated) = tables.budget_items.get(item_id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            updated.name = require_text("name", &name)?;
        }
        if changes.description.is_some() {
            updated.description = optional_text(changes.description);
        }
        if let Some(category) = changes.category {
            updated.category = require_text("category", &category)?;
        }
        if let Some(amount) = changes.estimated_amount {
            updated.estimated_amount = require_estimate(amount)?;
        }

        tables.budget_items.rows.insert(item_id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_budget_item(&self, item_id: i64) -> Result<bool> {
        Ok(self.tables.write().await.budget_items.remove(item_id))
    }

    async fn create_category(&self, new: NewCategory) -> Result<category::Model> {
        self.tables.write().await.create_category(new)
    }

    async fn list_categories(
        &self,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<category::Model>> {
        let mut categories: Vec<category::Model> = self
            .tables
            .read()
            .await
            .categories
            .values()
            .filter(|c| category_type.is_none_or(|wanted| c.category_type.matches(wanted)))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(
        &self,
        category_id: i64,
        changes: CategoryChanges,
    ) -> Result<Option<category::Model>> {
        let mut tables = self.tables.write().await;
        let Some(mut updated) = tables.categories.get(category_id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            let name = require_text("name", &name)?;
            if name != updated.name {
                if tables.category_by_name(&name).is_some() {
                    return Err(Error::Conflict {
                        field: "category name",
                        value: name,
                    });
                }
                updated.name = name;
            }
        }
        if let Some(category_type) = changes.category_type {
            updated.category_type = category_type;
        }
        if changes.description.is_some() {
            updated.description = optional_text(changes.description);
        }

        tables.categories.rows.insert(category_id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_category(&self, category_id: i64) -> Result<bool> {
        Ok(self.tables.write().await.categories.remove(category_id))
    }

    async fn seed_categories(&self, names: &[String]) -> Result<usize> {
        let mut tables = self.tables.write().await;
        let mut seeded = 0;
        for name in names {
            if tables.category_by_name(name).is_some() {
                continue;
            }
            tables.create_category(NewCategory {
                name: name.clone(),
                category_type: CategoryType::Both,
                description: None,
            })?;
            seeded += 1;
        }
        if seeded > 0 {
            info!(seeded, "Seeded categories from configuration");
        }
        Ok(seeded)
    }

    async fn create_user(&self, new: NewUser) -> Result<user::Model> {
        let username = require_text("username", &new.username)?;
        if new.role != Role::Superadmin && new.section.as_deref().is_none_or(|s| s.trim().is_empty())
        {
            return Err(Error::validation("section admins and students need a section"));
        }

        let mut tables = self.tables.write().await;
        if tables.user_by_username(&username).is_some() {
            return Err(Error::Conflict {
                field: "username",
                value: username,
            });
        }

        let created = tables.users.insert_with(|id| user::Model {
            id,
            username,
            password_hash: new.password_hash,
            role: new.role,
            section: new.section.map(|s| s.trim().to_string()),
            attendee_id: new.attendee_id,
            created_at: Utc::now(),
        });
        info!(user_id = created.id, role = ?created.role, "Created user account");
        Ok(created)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<user::Model>> {
        Ok(self.tables.read().await.users.get(user_id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(self.tables.read().await.user_by_username(username).cloned())
    }

    async fn find_user_by_attendee(&self, attendee_id: i64) -> Result<Option<user::Model>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.attendee_id == Some(attendee_id))
            .cloned())
    }

    async fn update_user_login(
        &self,
        user_id: i64,
        changes: LoginChanges,
    ) -> Result<Option<user::Model>> {
        let mut tables = self.tables.write().await;
        let Some(mut account) = tables.users.get(user_id) else {
            return Ok(None);
        };

        if let Some(username) = changes.username {
            let username = require_text("username", &username)?;
            if username != account.username {
                if tables.user_by_username(&username).is_some() {
                    return Err(Error::Conflict {
                        field: "username",
                        value: username,
                    });
                }
                account.username = username;
            }
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(section) = changes.section {
            account.section = Some(require_text("section", &section)?);
        }

        tables.users.rows.insert(user_id, account.clone());
        info!(user_id, "Updated login account");
        Ok(Some(account))
    }

    async fn list_users(&self) -> Result<Vec<user::Model>> {
        let mut users: Vec<user::Model> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool> {
        Ok(self.tables.write().await.users.remove(user_id))
    }

    async fn get_dashboard_summary(
        &self,
        settings: &SummarySettings,
        today: NaiveDate,
    ) -> Result<DashboardSummary> {
        let tables = self.tables.read().await;
        let attendees: Vec<attendee::Model> = tables.attendees.values().cloned().collect();
        let total_contributions = tables.contributions.values().map(|c| c.amount).sum();
        let total_expenses = tables.expenses.values().map(|e| e.amount).sum();
        let total_budget = tables
            .budget_items
            .values()
            .map(|b| b.estimated_amount)
            .sum();

        Ok(summary::compute_dashboard(
            &attendees,
            total_contributions,
            total_expenses,
            total_budget,
            settings,
            today,
        ))
    }

    async fn get_budget_summary(&self, settings: &SummarySettings) -> Result<BudgetSummary> {
        let tables = self.tables.read().await;
        let budget_items: Vec<budget_item::Model> = tables.budget_items.values().cloned().collect();
        let expenses: Vec<expense::Model> = tables.expenses.values().cloned().collect();
        let total_contributions = tables.contributions.values().map(|c| c.amount).sum();

        Ok(summary::compute_budget_summary(
            &budget_items,
            &expenses,
            total_contributions,
            &settings.categories,
        ))
    }
}
