//! Static role → page policy

use crate::utils::error::{AccessError, Result};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::types::{AccessDecision, PageId, Role};

static STANDARD: Lazy<PolicyTable> = Lazy::new(PolicyTable::build_standard);

static MINIMAL: Lazy<HashSet<PageId>> = Lazy::new(|| HashSet::from([PageId::DEFAULT]));

/// Mapping from each role to the pages it may open
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<Role, HashSet<PageId>>,
}

impl PolicyTable {
    /// Process-wide table used by the application
    pub fn standard() -> &'static PolicyTable {
        &STANDARD
    }

    /// Build a table from explicit entries
    ///
    /// Nothing is checked here; call [`PolicyTable::validate`] before
    /// enforcing a hand-built table.
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = PageId>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(role, pages)| (role, pages.into_iter().collect()))
                .collect(),
        }
    }

    fn build_standard() -> Self {
        debug!("Building standard policy table");

        Self::from_entries([
            (Role::Admin, PageId::ALL.to_vec()),
            (
                Role::Manager,
                vec![
                    PageId::Dashboard,
                    PageId::Products,
                    PageId::Categories,
                    PageId::Clients,
                    PageId::Employees,
                    PageId::Finances,
                    PageId::Reports,
                    PageId::Media,
                ],
            ),
            (
                Role::Cashier,
                vec![
                    PageId::Dashboard,
                    PageId::Products,
                    PageId::Clients,
                    PageId::Finances,
                ],
            ),
            (
                Role::Salesperson,
                vec![
                    PageId::Dashboard,
                    PageId::Products,
                    PageId::Categories,
                    PageId::Clients,
                ],
            ),
            (Role::User, vec![PageId::Dashboard]),
        ])
    }

    /// Pages `role` may open; never empty
    pub fn allowed_pages(&self, role: Role) -> &HashSet<PageId> {
        match self.entries.get(&role) {
            Some(pages) => pages,
            None => {
                warn!(
                    role = %role,
                    "Policy table has no entry for role, falling back to the default page only"
                );
                &MINIMAL
            }
        }
    }

    /// Whether `role` may open `page`
    pub fn has_page_access(&self, role: Role, page: PageId) -> bool {
        self.allowed_pages(role).contains(&page)
    }

    pub fn decide(&self, role: Role, page: PageId) -> AccessDecision {
        AccessDecision {
            role,
            page,
            allowed: self.has_page_access(role, page),
        }
    }

    /// Roles that may open `page`, most privileged first
    pub fn roles_with_access(&self, page: PageId) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_page_access(*role, page))
            .collect()
    }

    /// Check the table invariants
    ///
    /// Every role has an entry, every entry contains the default page, admin
    /// holds every page, and no role holds a page admin lacks.
    pub fn validate(&self) -> Result<()> {
        let admin = self
            .entries
            .get(&Role::Admin)
            .ok_or_else(|| AccessError::policy("no entry for role admin"))?;

        if let Some(missing) = PageId::ALL.into_iter().find(|p| !admin.contains(p)) {
            return Err(AccessError::policy(format!(
                "admin is missing page {}",
                missing
            )));
        }

        for role in Role::ALL {
            let pages = self
                .entries
                .get(&role)
                .ok_or_else(|| AccessError::policy(format!("no entry for role {}", role)))?;

            if pages.is_empty() {
                return Err(AccessError::policy(format!(
                    "role {} has an empty page set",
                    role
                )));
            }
            if !pages.contains(&PageId::DEFAULT) {
                return Err(AccessError::policy(format!(
                    "role {} cannot open {}",
                    role,
                    PageId::DEFAULT
                )));
            }
            if let Some(extra) = pages.iter().find(|p| !admin.contains(*p)) {
                return Err(AccessError::policy(format!(
                    "role {} holds page {} that admin lacks",
                    role, extra
                )));
            }
        }

        Ok(())
    }
}
