//! Identity event integration tests
//!
//! Cached roles follow the session: sign-in and sign-out drop them, token
//! refreshes do not.

#[cfg(test)]
mod tests {
    use crate::common::AccessFixture;
    use bizdesk_access::{GuardDecision, PageId, Role};
    use std::time::Duration;

    /// Wait until `condition` holds, giving the watcher task time to run
    async fn eventually(condition: impl Fn() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        condition()
    }

    #[tokio::test]
    async fn test_sign_out_drops_cached_role() {
        let fx = AccessFixture::new();
        let _watcher = fx.access.start();
        let session = fx.sign_in_as("admin");

        assert_eq!(fx.access.current_role().await, Role::Admin);
        assert!(fx.access.resolver().cached_role(&session).is_some());

        fx.identity.sign_out();

        assert!(eventually(|| fx.access.resolver().cached_role(&session).is_none()).await);
        assert_eq!(
            fx.access.guard_current(PageId::Settings).await,
            GuardDecision::RedirectToLogin
        );
    }

    /// A new sign-in never sees the previous identity's role
    #[tokio::test]
    async fn test_role_does_not_leak_across_sessions() {
        let fx = AccessFixture::new();
        let _watcher = fx.access.start();

        let admin = fx.sign_in_as("admin");
        assert_eq!(
            fx.access.guard_current(PageId::UserManagement).await,
            GuardDecision::Render
        );

        fx.identity.sign_out();
        assert!(eventually(|| fx.access.resolver().cached_role(&admin).is_none()).await);

        let _cashier = fx.sign_in_as("cashier");
        assert_eq!(fx.access.current_role().await, Role::Cashier);
        assert_eq!(
            fx.access.guard_current(PageId::UserManagement).await,
            GuardDecision::RedirectToDefault
        );
    }

    /// Role changes in the store become visible on the next sign-in
    #[tokio::test]
    async fn test_sign_in_refetches_role() {
        let fx = AccessFixture::new();
        let _watcher = fx.access.start();
        let session = fx.sign_in_as("salesperson");

        assert_eq!(fx.access.current_role().await, Role::Salesperson);

        fx.store.insert_role(session.identity.clone(), "manager");
        assert_eq!(fx.access.current_role().await, Role::Salesperson);

        fx.identity.sign_in(session.identity.clone());
        assert_eq!(fx.access.current_role().await, Role::Manager);
        assert_eq!(fx.store.fetch_count(), 2);
    }

    /// The new session misses the cache before the watcher has run
    #[tokio::test]
    async fn test_same_identity_new_session_refetches_immediately() {
        let fx = AccessFixture::new();
        let _watcher = fx.access.start();
        let session = fx.sign_in_as("admin");
        assert_eq!(fx.access.current_role().await, Role::Admin);

        fx.store.insert_role(session.identity.clone(), "user");
        fx.identity.sign_out();
        fx.identity.sign_in(session.identity.clone());

        assert_eq!(fx.access.current_role().await, Role::User);
        assert_eq!(
            fx.access.guard_current(PageId::Settings).await,
            GuardDecision::RedirectToDefault
        );
    }

    /// A sign-in event applied after resolution keeps that resolution
    #[tokio::test]
    async fn test_second_resolve_after_sign_in_is_cached() {
        let fx = AccessFixture::new();
        let _watcher = fx.access.start();
        fx.sign_in_as("manager");

        let first = fx.access.current_role().await;
        tokio::task::yield_now().await;
        let second = fx.access.current_role().await;

        assert_eq!(first, Role::Manager);
        assert_eq!(second, first);
        assert_eq!(fx.store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_token_refresh_keeps_cached_role() {
        let fx = AccessFixture::new();
        let _watcher = fx.access.start();
        let session = fx.sign_in_as("manager");

        assert_eq!(fx.access.current_role().await, Role::Manager);
        let refreshed = fx.identity.refresh_token().expect("signed in");
        assert_eq!(refreshed.session_id, session.session_id);
        assert_ne!(refreshed.access_token, session.access_token);

        tokio::task::yield_now().await;

        assert_eq!(fx.access.resolver().cached_role(&refreshed), Some(Role::Manager));
        assert_eq!(fx.access.current_role().await, Role::Manager);
        assert_eq!(fx.store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_supersedes_pending_navigation() {
        let fx = AccessFixture::new();
        let _session = fx.sign_in_as("admin");
        let guard = fx.access.guard();

        let ticket = guard.begin_navigation();
        guard.handle_session_event(&bizdesk_access::SessionEvent::SignedOut);
        fx.identity.sign_out();

        let decision = guard.navigate(ticket, None, PageId::Settings).await;
        assert_eq!(decision, None);

        assert_eq!(
            fx.access.navigate_current(PageId::Settings).await,
            Some(GuardDecision::RedirectToLogin)
        );
    }
}
