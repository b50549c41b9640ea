//! Bulk attendee import - merges externally sourced records keyed by mobile number.
//!
//! Each record is matched on its mobile number. A match is updated in place; anything
//! else is inserted as a new attendee. Records are processed one at a time in input order
//! with no surrounding transaction. A failing record is reported and skipped, and the
//! records already written stay written.

use crate::{
    core::attendee,
    entities::attendee as attendee_entity,
    errors::Result,
    models::NewAttendee,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};

/// A record that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    /// Position of the record in the input
    pub index: usize,
    /// Mobile number of the record, as supplied
    pub mobile: String,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Created or updated attendees, in input order
    pub attendees: Vec<attendee_entity::Model>,
    /// Number of newly inserted attendees
    pub created: usize,
    /// Ids of the newly inserted attendees
    pub created_ids: Vec<i64>,
    /// Number of existing attendees that were updated
    pub updated: usize,
    /// Records that were skipped
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// Records a skipped row.
    pub fn skip(&mut self, index: usize, mobile: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(index, mobile, %reason, "Skipping import record");
        self.failures.push(ImportFailure {
            index,
            mobile: mobile.to_string(),
            reason,
        });
    }

    /// Adds a successfully upserted record.
    pub fn record(&mut self, outcome: Upserted) {
        match outcome {
            Upserted::Created(model) => {
                self.created += 1;
                self.created_ids.push(model.id);
                self.attendees.push(model);
            }
            Upserted::Updated(model) => {
                self.updated += 1;
                self.attendees.push(model);
            }
        }
    }

    /// Logs the totals once the import is done.
    pub fn log_finished(&self) {
        info!(
            created = self.created,
            updated = self.updated,
            skipped = self.failures.len(),
            "Bulk import finished"
        );
    }

    /// Whether the attendee with `attendee_id` was inserted (rather than updated).
    #[must_use]
    pub fn was_created(&self, attendee_id: i64) -> bool {
        self.created_ids.contains(&attendee_id)
    }
}

/// Result of upserting a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upserted {
    /// A new attendee was inserted
    Created(attendee_entity::Model),
    /// An existing attendee was overwritten
    Updated(attendee_entity::Model),
}

/// Inserts or updates one attendee keyed by mobile number.
pub async fn upsert_attendee(db: &DatabaseConnection, record: NewAttendee) -> Result<Upserted> {
    match attendee::get_attendee_by_mobile(db, &record.mobile).await? {
        Some(existing) => {
            let id = existing.id;
            let updated = attendee::update_attendee(db, id, record.into())
                .await?
                .unwrap_or(existing);
            Ok(Upserted::Updated(updated))
        }
        None => attendee::create_attendee(db, record)
            .await
            .map(Upserted::Created),
    }
}

/// Imports `records` in order, continuing past individual failures.
pub async fn bulk_import_attendees(
    db: &DatabaseConnection,
    records: Vec<NewAttendee>,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for (index, record) in records.into_iter().enumerate() {
        let mobile = record.mobile.clone();
        match upsert_attendee(db, record).await {
            Ok(outcome) => report.record(outcome),
            Err(e) => report.skip(index, &mobile, e.to_string()),
        }
    }

    report.log_finished();
    Ok(report)
}
