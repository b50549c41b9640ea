//! Core business logic - framework-agnostic operations over a `SeaORM` connection.
//!
//! Each module owns one table's rules. The HTTP layer reaches these through
//! [`crate::repository`], never directly.

/// Attendee records and their plain fields
pub mod attendee;
/// Budget line items
pub mod budget;
/// Category vocabulary
pub mod category;
/// Contribution ledger and the cached per-attendee totals
pub mod contribution;
/// Recorded expenses
pub mod expense;
/// Bulk attendee import keyed by mobile number
pub mod import;
/// Dashboard and budget summaries
pub mod summary;
/// Login accounts
pub mod user;
