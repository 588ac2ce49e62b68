//! RBAC type definitions

use serde::{Deserialize, Serialize};

/// Role of a signed-in identity
///
/// Closed set. Values coming from storage go through [`super::parse_role`],
/// which maps anything unknown to [`Role::User`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Owner / administrator, full access
    Admin,
    /// Store manager
    Manager,
    /// Point-of-sale operator
    Cashier,
    /// Sales staff
    Salesperson,
    /// Least-privileged fallback role
    #[default]
    User,
}

impl Role {
    /// Every role, most privileged first
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Cashier,
        Role::Salesperson,
        Role::User,
    ];

    /// Storage / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
            Role::Salesperson => "salesperson",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protected area of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    Dashboard,
    Products,
    Categories,
    Clients,
    UserManagement,
    Employees,
    Finances,
    Reports,
    Media,
    Settings,
}

impl PageId {
    /// Every page, in navigation order
    pub const ALL: [PageId; 10] = [
        PageId::Dashboard,
        PageId::Products,
        PageId::Categories,
        PageId::Clients,
        PageId::UserManagement,
        PageId::Employees,
        PageId::Finances,
        PageId::Reports,
        PageId::Media,
        PageId::Settings,
    ];

    /// Landing page every role can reach
    pub const DEFAULT: PageId = PageId::Dashboard;

    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Dashboard => "dashboard",
            PageId::Products => "products",
            PageId::Categories => "categories",
            PageId::Clients => "clients",
            PageId::UserManagement => "user_management",
            PageId::Employees => "employees",
            PageId::Finances => "finances",
            PageId::Reports => "reports",
            PageId::Media => "media",
            PageId::Settings => "settings",
        }
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        PageId::ALL
            .into_iter()
            .find(|page| page.as_str() == normalized)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

/// Outcome of guarding a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecision {
    /// Show the requested page
    Render,
    /// Send the user to [`PageId::DEFAULT`]
    RedirectToDefault,
    /// No session, send the user to sign in
    RedirectToLogin,
}

impl GuardDecision {
    /// Page to navigate to instead of the requested one, if any
    pub fn redirect_target(&self) -> Option<PageId> {
        match self {
            GuardDecision::RedirectToDefault => Some(PageId::DEFAULT),
            GuardDecision::Render | GuardDecision::RedirectToLogin => None,
        }
    }
}

impl std::fmt::Display for GuardDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardDecision::Render => write!(f, "render"),
            GuardDecision::RedirectToDefault => write!(f, "redirect:{}", PageId::DEFAULT),
            GuardDecision::RedirectToLogin => write!(f, "redirect:login"),
        }
    }
}

/// Result of a non-blocking guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardCheck {
    /// Role resolution has not completed; render a neutral loading state
    Pending,
    /// Final decision
    Decided(GuardDecision),
}

/// Per-navigation access decision, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub role: Role,
    pub page: PageId,
    pub allowed: bool,
}
