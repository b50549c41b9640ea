//! Authentication and authorization.
//!
//! Credentials are Argon2 hashes; a successful login opens a server-side session whose
//! opaque id travels in a cookie. Each request resolves that session into a
//! [`Principal`] whose role and section decide what it may touch.

/// Login checks and account provisioning
pub mod accounts;
/// Argon2id password hashing
pub mod password;
/// Authenticated principal and role policy
pub mod principal;
/// Server-side login sessions
pub mod session;

pub use accounts::{authenticate, ensure_student_account, seed_superadmin, sync_student_account};
pub use password::PasswordService;
pub use principal::Principal;
pub use session::{Session, SessionStore};
