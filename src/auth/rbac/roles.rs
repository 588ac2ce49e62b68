//! Role name parsing

use super::types::Role;

/// Lookup by exact name after trimming and ASCII lowercasing
fn lookup(raw: &str) -> Option<Role> {
    let normalized = raw.trim().to_ascii_lowercase();
    Role::ALL
        .into_iter()
        .find(|role| role.as_str() == normalized)
}

/// Normalize a stored role string into a [`Role`]
///
/// Total: anything outside the enumeration, including the empty string and
/// legacy values such as `superadmin`, becomes [`Role::User`].
pub fn parse_role(raw: &str) -> Role {
    lookup(raw).unwrap_or(Role::User)
}

/// Same as [`parse_role`] but reports whether the input had to be normalized
pub fn parse_role_checked(raw: &str) -> (Role, bool) {
    match lookup(raw) {
        Some(role) => (role, false),
        None => (Role::User, true),
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).ok_or_else(|| format!("Unknown role: {}", s))
    }
}
