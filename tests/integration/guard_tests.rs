//! Route guard integration tests
//!
//! Guard decisions through the public API, including the failure paths
//! that must never render a protected page.

#[cfg(test)]
mod tests {
    use crate::common::{AccessFixture, RoleFactory};
    use bizdesk_access::config::AccessConfig;
    use bizdesk_access::{
        GuardCheck, GuardDecision, PageId, ResolutionState, Role, Session, StoreFailure, parse_role,
    };

    // ==================== Decisions ====================

    #[tokio::test]
    async fn test_salesperson_finances_redirects() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("salesperson");

        assert!(!fx.access.policy().has_page_access(Role::Salesperson, PageId::Finances));
        assert_eq!(
            fx.access.guard().guard(Some(&session), PageId::Finances).await,
            GuardDecision::RedirectToDefault
        );
    }

    #[tokio::test]
    async fn test_admin_settings_renders() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("admin");

        assert!(fx.access.policy().has_page_access(Role::Admin, PageId::Settings));
        assert_eq!(
            fx.access.guard().guard(Some(&session), PageId::Settings).await,
            GuardDecision::Render
        );
    }

    #[tokio::test]
    async fn test_no_session_redirects_to_login() {
        let fx = AccessFixture::new();

        assert_eq!(
            fx.access.guard().guard(None, PageId::Dashboard).await,
            GuardDecision::RedirectToLogin
        );
        assert_eq!(
            fx.access.guard_current(PageId::Dashboard).await,
            GuardDecision::RedirectToLogin
        );
    }

    #[tokio::test]
    async fn test_network_error_resolves_to_user() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("manager");
        fx.store
            .fail_with(Some(StoreFailure::Network("connection reset".to_string())));

        let role = fx.access.resolver().resolve_role(Some(&session)).await;

        assert_eq!(role, Role::User);
        assert_eq!(
            fx.access.guard().guard(Some(&session), PageId::Dashboard).await,
            GuardDecision::Render
        );
        assert_eq!(
            fx.access.guard().guard(Some(&session), PageId::Employees).await,
            GuardDecision::RedirectToDefault
        );
        assert_eq!(fx.sink.events_named("role_resolution_failed").len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_stored_role_normalizes_to_user() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("superadmin");

        assert_eq!(parse_role("superadmin"), Role::User);
        assert_eq!(
            fx.access.resolver().resolve_role(Some(&session)).await,
            Role::User
        );
        assert_eq!(fx.sink.events_named("role_normalized").len(), 1);
    }

    // ==================== Properties ====================

    /// Failed or corrupt resolution never renders anything but the dashboard
    #[tokio::test]
    async fn test_default_deny() {
        for raw in RoleFactory::corrupt() {
            let fx = AccessFixture::new();
            let session = fx.session_with_role(raw);

            for page in PageId::ALL {
                let decision = fx.access.guard().guard(Some(&session), page).await;
                if page != PageId::Dashboard {
                    assert_ne!(decision, GuardDecision::Render, "{:?} opened {}", raw, page);
                }
            }
        }

        let fx = AccessFixture::new();
        let session = fx.session_with_role("admin");
        fx.store
            .fail_with(Some(StoreFailure::Malformed("bad row".to_string())));
        for page in PageId::ALL {
            let decision = fx.access.guard().guard(Some(&session), page).await;
            if page != PageId::Dashboard {
                assert_eq!(decision, GuardDecision::RedirectToDefault);
            }
        }

        let fx = AccessFixture::new();
        for page in PageId::ALL {
            assert_eq!(
                fx.access.guard().guard(None, page).await,
                GuardDecision::RedirectToLogin
            );
        }
    }

    /// Second resolution of an unchanged session is served from cache
    #[tokio::test]
    async fn test_resolution_idempotent() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("cashier");

        let first = fx.access.resolver().resolve_role(Some(&session)).await;
        let second = fx.access.resolver().resolve_role(Some(&session)).await;

        assert_eq!(first, Role::Cashier);
        assert_eq!(first, second);
        assert_eq!(fx.store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_every_known_role_resolves() {
        let fx = AccessFixture::new();

        for (raw, expected) in RoleFactory::known() {
            let session = fx.session_with_role(raw);
            assert_eq!(
                fx.access.resolver().resolve_role(Some(&session)).await,
                expected
            );
        }
    }

    #[tokio::test]
    async fn test_redirect_target_is_always_reachable() {
        let fx = AccessFixture::new();

        for (raw, _) in RoleFactory::known() {
            let session = fx.session_with_role(raw);
            for page in PageId::ALL {
                let decision = fx.access.guard().guard(Some(&session), page).await;
                if let Some(target) = decision.redirect_target() {
                    assert_eq!(
                        fx.access.guard().guard(Some(&session), target).await,
                        GuardDecision::Render
                    );
                }
            }
        }
    }

    // ==================== Non-blocking checks ====================

    #[tokio::test]
    async fn test_pending_until_resolved() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("manager");
        let guard = fx.access.guard();

        assert_eq!(
            fx.access.resolver().resolution_state(Some(&session)),
            ResolutionState::Unresolved
        );
        assert_eq!(
            guard.check_resolved(Some(&session), PageId::Reports),
            GuardCheck::Pending
        );

        guard.guard(Some(&session), PageId::Reports).await;

        assert_eq!(
            fx.access.resolver().resolution_state(Some(&session)),
            ResolutionState::Resolved(Role::Manager)
        );
        assert_eq!(
            guard.check_resolved(Some(&session), PageId::Reports),
            GuardCheck::Decided(GuardDecision::Render)
        );
    }

    // ==================== Audit ====================

    #[tokio::test]
    async fn test_denials_are_audited_once_each() {
        let fx = AccessFixture::new();
        let session = fx.session_with_role("user");

        for page in [PageId::Settings, PageId::Media, PageId::Dashboard] {
            fx.access.guard().guard(Some(&session), page).await;
        }

        let denied = fx.sink.events_named("access_denied");
        assert_eq!(denied.len(), 2);
        assert_eq!(denied[0].attr_str("page"), Some("settings"));
        assert_eq!(denied[1].attr_str("page"), Some("media"));
        assert!(denied.iter().all(|e| e.attr_str("role") == Some("user")));
    }

    #[tokio::test]
    async fn test_audit_disabled_by_config() {
        let config = AccessConfig {
            audit_denials: false,
            ..AccessConfig::default()
        };
        let fx = AccessFixture::with_config(&config);
        let session = Session::new(RoleFactory::identity());

        let decision = fx.access.guard().guard(Some(&session), PageId::Settings).await;

        assert_eq!(decision, GuardDecision::RedirectToDefault);
        assert!(fx.sink.events_named("access_denied").is_empty());
    }
}
