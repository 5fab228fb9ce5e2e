//! Identity stream.
//!
//! The authentication flow itself is out of scope; this module only models
//! the boundary: a current identity (user email plus bearer credential)
//! that coordinators and the request plumbing observe through a watch
//! channel. Every change, including the transition to no identity, is
//! visible to subscribers.

use std::sync::Arc;
use tokio::sync::watch;

/// The authenticated user, as far as this layer cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User email, used to scope order history
    pub email: String,
    /// Bearer credential attached to authenticated requests
    pub token: String,
}

impl Identity {
    /// Create a new identity.
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }
}

/// Read side of the identity stream.
pub type IdentityWatch = watch::Receiver<Option<Identity>>;

/// Write side of the identity stream, owned by the authentication layer.
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    tx: Arc<watch::Sender<Option<Identity>>>,
}

impl IdentityProvider {
    /// Create a provider with no identity signed in.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Install a signed-in identity.
    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    /// Clear the identity.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// The identity right now, if any.
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Subscribe to identity changes.
    pub fn watch(&self) -> IdentityWatch {
        self.tx.subscribe()
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}
