//! External collaborators of the access gate
//!
//! The identity provider, record store and observability sink are consumed
//! through the traits in this module. In-memory implementations are bundled
//! for embedding and testing.

mod memory;
mod sink;
mod traits;
mod types;

pub use memory::{InMemoryIdentityProvider, InMemoryRecordStore, StoreFailure};
pub use sink::{RecordedEvent, RecordingSink, TracingSink};
#[cfg(test)]
pub use traits::MockRecordStore;
pub use traits::{IdentityProvider, ObservabilitySink, RecordStore};
pub use types::{Attributes, IdentityKey, RoleRecord, Session, SessionEvent};
