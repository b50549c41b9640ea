//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod attendee;
pub mod budget_item;
pub mod category;
pub mod contribution;
pub mod enums;
pub mod expense;
pub mod user;

// Re-export specific types to avoid conflicts
pub use attendee::{Column as AttendeeColumn, Entity as Attendee, Model as AttendeeModel};
pub use budget_item::{
    Column as BudgetItemColumn, Entity as BudgetItem, Model as BudgetItemModel,
};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use contribution::{
    Column as ContributionColumn, Entity as Contribution, Model as ContributionModel,
};
pub use enums::{AttendingStatus, CategoryType, PaidStatus, Role};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
