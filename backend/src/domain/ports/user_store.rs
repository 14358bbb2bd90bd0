//! Driven port for player state storage.
//!
//! Lock contract for implementations: the username map sits behind a
//! reader/writer lock and every record behind its own mutex. The map lock is
//! always taken first and released before a record lock is acquired, so no
//! caller ever waits on the map while holding a player.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::domain::user::{User, Username};

/// Shared, lockable reference to one player's state.
///
/// Cloning the handle clones the reference, not the player.
#[derive(Debug, Clone)]
pub struct UserHandle(Arc<Mutex<User>>);

impl UserHandle {
    /// Take ownership of `user` behind a fresh lock.
    #[must_use]
    pub fn new(user: User) -> Self {
        Self(Arc::new(Mutex::new(user)))
    }

    /// Exclusive access to the player for the lifetime of the guard.
    ///
    /// Hold the guard across every step of a compound operation.
    pub fn lock(&self) -> MutexGuard<'_, User> {
        self.0.lock()
    }

    /// Whether both handles refer to the same stored player.
    #[must_use]
    pub fn same_player(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Concurrency-safe mapping from username to player state.
#[cfg_attr(test, mockall::automock)]
pub trait UserStore: Send + Sync {
    /// Look up an existing player.
    fn get(&self, username: &Username) -> Option<UserHandle>;

    /// The well-known default player, created on first use.
    fn get_or_create_default(&self) -> UserHandle;

    /// Create a player with the new-user starting balance. An existing
    /// username is returned unchanged.
    fn create(&self, username: Username) -> UserHandle;
}
