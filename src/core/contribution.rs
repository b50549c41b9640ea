//! Contribution ledger business logic.
//!
//! Every create, update and delete on the ledger also adjusts the owning attendee's cached
//! `contribution_amount`, so that it always equals the sum of that attendee's ledger rows.
//! Each operation runs in a single database transaction and applies the change as an
//! in-place arithmetic update (`contribution_amount = contribution_amount + delta`), so
//! concurrent writers cannot overwrite each other's totals.
//!
//! Every ledger transaction issues a write as its first statement. On `SQLite` a deferred
//! transaction that reads first cannot later become a writer once another connection has
//! committed; it fails with `SQLITE_BUSY` instead of waiting for the lock.
//!
//! The first contribution an attendee ever receives also promotes their `paid_status`
//! to `paid`. Later contributions, updates and deletes never touch the status.

use crate::{
    entities::{Attendee, Contribution, PaidStatus, attendee, contribution},
    errors::{Error, Result},
    models::{ContributionChanges, ContributionFilter},
};
use chrono::NaiveDate;
use sea_orm::{
    PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// An attendee whose cached total disagreed with their ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDrift {
    /// Attendee whose total was rebuilt
    pub attendee_id: i64,
    /// Cached `contribution_amount` before the rebuild
    pub cached: i64,
    /// Sum of the attendee's ledger rows
    pub ledger: i64,
}

/// Adds `delta` to an attendee's cached total in a single UPDATE statement.
async fn adjust_contribution_total<C>(db: &C, attendee_id: i64, delta: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Attendee::update_many()
        .col_expr(
            attendee::Column::ContributionAmount,
            Expr::col(attendee::Column::ContributionAmount).add(delta),
        )
        .filter(attendee::Column::Id.eq(attendee_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found("attendee", attendee_id));
    }
    Ok(())
}

/// Rewrites a contribution row in place, taking the write lock before anything is read.
///
/// Returns whether the row exists.
async fn lock_contribution<C>(db: &C, contribution_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Contribution::update_many()
        .col_expr(
            contribution::Column::Amount,
            Expr::col(contribution::Column::Amount).into(),
        )
        .filter(contribution::Column::Id.eq(contribution_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Subtracts `amount` from an attendee's cached total, never going below zero.
async fn release_contribution_total<C>(db: &C, attendee_id: i64, amount: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let floored = Expr::case(
        Expr::col(attendee::Column::ContributionAmount).gt(amount),
        Expr::col(attendee::Column::ContributionAmount).sub(amount),
    )
    .finally(0);

    Attendee::update_many()
        .col_expr(attendee::Column::ContributionAmount, floored.into())
        .filter(attendee::Column::Id.eq(attendee_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Records a new contribution and credits it to the attendee.
///
/// Fails with [`Error::InvalidAmount`] for a non-positive amount and with
/// [`Error::NotFound`] when the attendee does not exist. When this is the attendee's
/// first contribution and they are not already `paid`, their status becomes `paid`.
///
/// # Arguments
/// * `attendee_id` - Attendee to credit
/// * `amount` - Amount received, must be positive
/// * `date` - Date the money was received
/// * `recorded_by` - User id of the admin recording it
pub async fn create_contribution(
    db: &DatabaseConnection,
    attendee_id: i64,
    amount: i64,
    date: NaiveDate,
    recorded_by: Option<i64>,
) -> Result<contribution::Model> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    adjust_contribution_total(&txn, attendee_id, amount).await?;
    let attendee = Attendee::find_by_id(attendee_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("attendee", attendee_id))?;

    let created = contribution::ActiveModel {
        attendee_id: Set(attendee_id),
        amount: Set(amount),
        date: Set(date),
        recorded_by: Set(recorded_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let ledger_rows = Contribution::find()
        .filter(contribution::Column::AttendeeId.eq(attendee_id))
        .count(&txn)
        .await?;
    if ledger_rows == 1 && attendee.paid_status != PaidStatus::Paid {
        Attendee::update_many()
            .col_expr(attendee::Column::PaidStatus, Expr::value(PaidStatus::Paid))
            .filter(attendee::Column::Id.eq(attendee_id))
            .exec(&txn)
            .await?;
        debug!(attendee_id, "First contribution, marked attendee as paid");
    }

    txn.commit().await?;
    info!(
        contribution_id = created.id,
        attendee_id, amount, "Recorded contribution"
    );
    Ok(created)
}

/// Retrieves a contribution by id.
pub async fn get_contribution<C>(db: &C, contribution_id: i64) -> Result<Option<contribution::Model>>
where
    C: ConnectionTrait,
{
    Contribution::find_by_id(contribution_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Changes the amount and/or date of a contribution.
///
/// Returns `Ok(None)` when the contribution does not exist; nothing is written in that
/// case. A changed amount moves the attendee's total by the difference.
pub async fn update_contribution(
    db: &DatabaseConnection,
    contribution_id: i64,
    changes: ContributionChanges,
) -> Result<Option<contribution::Model>> {
    if let Some(amount) = changes.amount {
        if amount <= 0 {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let txn = db.begin().await?;

    if !lock_contribution(&txn, contribution_id).await? {
        return Ok(None);
    }
    let Some(existing) = get_contribution(&txn, contribution_id).await? else {
        return Ok(None);
    };

    let amount_changed = changes.amount.is_some_and(|a| a != existing.amount);
    let date_changed = changes.date.is_some_and(|d| d != existing.date);
    if !amount_changed && !date_changed {
        return Ok(Some(existing));
    }

    let old_amount = existing.amount;
    let attendee_id = existing.attendee_id;
    let mut active: contribution::ActiveModel = existing.into();
    if let Some(amount) = changes.amount.filter(|_| amount_changed) {
        active.amount = Set(amount);
    }
    if let Some(date) = changes.date.filter(|_| date_changed) {
        active.date = Set(date);
    }
    let updated = active.update(&txn).await?;

    let delta = updated.amount - old_amount;
    if delta != 0 {
        adjust_contribution_total(&txn, attendee_id, delta).await?;
    }

    txn.commit().await?;
    debug!(contribution_id, attendee_id, delta, "Updated contribution");
    Ok(Some(updated))
}

/// Deletes a contribution and removes its amount from the attendee's total.
///
/// The total is floored at zero. Returns `Ok(false)` when the contribution does not exist.
/// `paid_status` is left as it is.
pub async fn delete_contribution(db: &DatabaseConnection, contribution_id: i64) -> Result<bool> {
    let txn = db.begin().await?;

    if !lock_contribution(&txn, contribution_id).await? {
        return Ok(false);
    }
    let Some(existing) = get_contribution(&txn, contribution_id).await? else {
        return Ok(false);
    };

    let attendee_id = existing.attendee_id;
    let amount = existing.amount;

    if let Some(attendee) = Attendee::find_by_id(attendee_id).one(&txn).await? {
        if attendee.contribution_amount < amount {
            warn!(
                attendee_id,
                cached = attendee.contribution_amount,
                amount,
                "Cached contribution total below deleted amount, clamping to zero"
            );
        }
    }

    existing.delete(&txn).await?;
    release_contribution_total(&txn, attendee_id, amount).await?;

    txn.commit().await?;
    info!(contribution_id, attendee_id, amount, "Deleted contribution");
    Ok(true)
}

/// Lists contributions, newest date first (ties broken by newest id).
///
/// `offset` only applies together with `limit`.
pub async fn list_contributions(
    db: &DatabaseConnection,
    filter: &ContributionFilter,
) -> Result<Vec<contribution::Model>> {
    let mut query = Contribution::find();

    if let Some(attendee_id) = filter.attendee_id {
        query = query.filter(contribution::Column::AttendeeId.eq(attendee_id));
    }
    if let Some(section) = &filter.section {
        query = query
            .inner_join(Attendee)
            .filter(attendee::Column::Section.eq(section.as_str()));
    }

    query = query
        .order_by_desc(contribution::Column::Date)
        .order_by_desc(contribution::Column::Id);

    if let Some(limit) = filter.limit {
        query = query.limit(limit);
        if let Some(offset) = filter.offset {
            query = query.offset(offset);
        }
    }

    query.all(db).await.map_err(Into::into)
}

/// Sums the ledger per attendee.
pub(crate) async fn ledger_totals<C>(db: &C) -> Result<HashMap<i64, i64>>
where
    C: ConnectionTrait,
{
    let rows: Vec<(i64, i64)> = Contribution::find()
        .select_only()
        .column(contribution::Column::AttendeeId)
        .column_as(contribution::Column::Amount.sum(), "total")
        .group_by(contribution::Column::AttendeeId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Rebuilds every attendee's cached total from the ledger.
///
/// Returns the attendees whose cached value had drifted, with before/after values.
pub async fn reconcile_contribution_totals(db: &DatabaseConnection) -> Result<Vec<TotalDrift>> {
    let txn = db.begin().await?;

    Attendee::update_many()
        .col_expr(
            attendee::Column::ContributionAmount,
            Expr::col(attendee::Column::ContributionAmount).into(),
        )
        .exec(&txn)
        .await?;
    let totals = ledger_totals(&txn).await?;
    let attendees = Attendee::find()
        .order_by_asc(attendee::Column::Id)
        .all(&txn)
        .await?;

    let mut drifts = Vec::new();
    for attendee in attendees {
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

        let mut active: attendee::ActiveModel = attendee.into();
        active.contribution_amount = Set(ledger);
        active.update(&txn).await?;
    }

    txn.commit().await?;
    info!(repaired = drifts.len(), "Reconciled contribution totals");
    Ok(drifts)
}
