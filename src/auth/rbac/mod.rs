//! Role-Based Access Control (RBAC) types and the page policy table

mod policy;
mod roles;
mod types;

pub use policy::PolicyTable;
pub use roles::{parse_role, parse_role_checked};
pub use types::{AccessDecision, GuardCheck, GuardDecision, PageId, Role};
