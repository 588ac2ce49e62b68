//! Identity event handling

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::RouteGuard;
use crate::identity::SessionEvent;

impl RouteGuard {
    /// Apply one identity event
    ///
    /// `signed_in` drops the roles of every other session and `signed_out`
    /// drops all of them; both supersede pending navigations.
    /// `token_refreshed` keeps everything.
    pub fn handle_session_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::SignedIn(session) => {
                info!(
                    identity = %session.identity,
                    "Signed in, invalidating roles of other sessions"
                );
                self.resolver.cache().invalidate_except(session);
                self.navigation.cancel_all();
            }
            SessionEvent::SignedOut => {
                info!("Signed out, invalidating cached roles");
                self.resolver.cache().invalidate_all();
                self.navigation.cancel_all();
            }
            SessionEvent::TokenRefreshed(_) => {
                debug!(event = event.name(), "Session event does not affect roles");
            }
        }
    }

    /// Consume identity events on a background task until the channel closes
    pub fn watch_identity(&self, mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
        let guard = self.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => guard.handle_session_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        // a missed sign-out cannot be ruled out
                        warn!(skipped, "Identity events lagged, invalidating cached roles");
                        guard.resolver.cache().invalidate_all();
                        guard.navigation.cancel_all();
                    }
                    Err(RecvError::Closed) => {
                        debug!("Identity event stream closed");
                        break;
                    }
                }
            }
        })
    }
}
