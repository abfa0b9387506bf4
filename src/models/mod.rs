//! Data models for the admin backend.
//!
//! - `AdminUser`: one row of the paginated user list
//! - `SubscriptionPlan` / `PlanPayload`: pricing plans and their edit payload
//! - `DashboardStats`: overview totals plus the monthly joinings series
//! - `Profile`: the signed-in admin's own profile
//! - `PaginationMeta`: the uniform `{ page, limit, total, totalPages }` shape

pub mod plan;
pub mod profile;
pub mod stats;
pub mod user;

pub use plan::{BillingCycle, PlanIcon, PlanPayload, SubscriptionPlan, SubscriptionPlansResponse};
pub use profile::Profile;
pub use stats::DashboardStats;
pub use user::{AdminUser, AdminUsersResponse, PaginationMeta, UserStatus};
