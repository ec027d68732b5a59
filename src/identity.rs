//! Identity of the account the adapter acts as
//!
//! Azure DevOps needs the acting user's GUID to complete a pull request. It
//! can be configured up front or learned from the author of the first comment
//! the adapter posts.

use std::sync::{Mutex, PoisonError};

/// Configured value meaning "learn the GUID from our first comment"
pub const AUTO: &str = "auto";

/// Current knowledge about the acting identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Explicitly configured empty; merges must fail
    Unset,
    /// Not known yet, still being discovered
    Auto,
    /// Known user GUID
    Known(String),
}

impl Identity {
    /// Interpret a configured value
    ///
    /// `None` and `"auto"` start discovery, `""` disables it.
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some(AUTO) => Self::Auto,
            Some("") => Self::Unset,
            Some(guid) => Self::Known(guid.to_string()),
        }
    }
}

/// Strategy for reading and learning the acting identity
///
/// Implementations must be safe to share across concurrent operations.
pub trait IdentityResolver: Send + Sync {
    /// Current identity
    fn get(&self) -> Identity;

    /// Record a discovered GUID
    ///
    /// Only transitions `Auto` to `Known`. Returns whether the value was stored.
    fn try_set(&self, guid: &str) -> bool;
}

/// Mutex-guarded identity cache, learn once and read many
#[derive(Debug)]
pub struct CachedIdentity {
    state: Mutex<Identity>,
}

impl CachedIdentity {
    /// Create a cache starting from `initial`
    pub const fn new(initial: Identity) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }
}

impl Default for CachedIdentity {
    fn default() -> Self {
        Self::new(Identity::Auto)
    }
}

impl IdentityResolver for CachedIdentity {
    fn get(&self) -> Identity {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn try_set(&self, guid: &str) -> bool {
        if guid.is_empty() {
            return false;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != Identity::Auto {
            return false;
        }
        *state = Identity::Known(guid.to_string());
        true
    }
}
