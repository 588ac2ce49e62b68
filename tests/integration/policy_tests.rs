//! Policy table integration tests
//!
//! Invariants of the standard table, checked over every role and page.

#[cfg(test)]
mod tests {
    use bizdesk_access::{PageId, PolicyTable, Role};

    /// Every role has a non-empty entry containing the dashboard
    #[test]
    fn test_table_completeness() {
        let policy = PolicyTable::standard();

        for role in Role::ALL {
            let pages = policy.allowed_pages(role);
            assert!(!pages.is_empty());
            assert!(pages.contains(&PageId::Dashboard));
        }
    }

    /// Admin can open every page, and nothing another role can open is
    /// closed to admin
    #[test]
    fn test_admin_superset() {
        let policy = PolicyTable::standard();

        for page in PageId::ALL {
            assert!(policy.has_page_access(Role::Admin, page), "admin lacks {}", page);
            for role in Role::ALL {
                if policy.has_page_access(role, page) {
                    assert!(policy.has_page_access(Role::Admin, page));
                }
            }
        }
    }

    /// Whatever the fallback role can open, every role can open
    #[test]
    fn test_user_is_least_privileged() {
        let policy = PolicyTable::standard();
        let user_pages = policy.allowed_pages(Role::User);

        for role in Role::ALL {
            assert!(user_pages.is_subset(policy.allowed_pages(role)));
        }
    }

    #[test]
    fn test_role_specific_pages() {
        let policy = PolicyTable::standard();

        assert!(policy.has_page_access(Role::Cashier, PageId::Finances));
        assert!(!policy.has_page_access(Role::Cashier, PageId::Employees));
        assert!(policy.has_page_access(Role::Manager, PageId::Employees));
        assert!(!policy.has_page_access(Role::Manager, PageId::UserManagement));
        assert!(!policy.has_page_access(Role::Salesperson, PageId::Finances));
        assert!(policy.has_page_access(Role::Salesperson, PageId::Categories));
    }

    #[test]
    fn test_has_page_access_is_pure() {
        let policy = PolicyTable::standard();

        for role in Role::ALL {
            for page in PageId::ALL {
                let first = policy.has_page_access(role, page);
                assert_eq!(first, policy.has_page_access(role, page));
                assert_eq!(first, policy.allowed_pages(role).contains(&page));
            }
        }
    }
}
