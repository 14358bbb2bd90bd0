//! Process-local [`UserStore`] backed by a locked hash map.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::ports::{UserHandle, UserStore};
use crate::domain::{User, UserId, Username};

/// Default starting balance of the pre-created default player.
pub const DEFAULT_USER_STARTING_CURRENCY: u64 = 10_000;
/// Default starting balance of players created on demand.
pub const NEW_USER_STARTING_CURRENCY: u64 = 1_000;

const DEFAULT_USER_ID: u64 = 1;
const FIRST_NAMED_USER_ID: u64 = 2;

/// Opening balances handed out at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingBalances {
    /// Balance of the default player.
    pub default_user: u64,
    /// Balance of every named player.
    pub new_user: u64,
}

impl Default for StartingBalances {
    fn default() -> Self {
        Self {
            default_user: DEFAULT_USER_STARTING_CURRENCY,
            new_user: NEW_USER_STARTING_CURRENCY,
        }
    }
}

/// Username-keyed map of player handles.
///
/// The default player always has id 1, whether created eagerly by
/// [`InMemoryUserStore::new`] or on first request. Named players take
/// sequential ids from 2. Players are never removed.
///
/// # Examples
/// ```
/// use gacha_backend::domain::ports::UserStore;
/// use gacha_backend::domain::Username;
/// use gacha_backend::outbound::memory::{InMemoryUserStore, StartingBalances};
///
/// let store = InMemoryUserStore::new(StartingBalances::default());
/// let bob = store.create(Username::new("bob").expect("valid username"));
/// assert_eq!(bob.lock().id().get(), 2);
/// assert_eq!(bob.lock().currency(), 1_000);
/// ```
#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<Directory>,
    balances: StartingBalances,
}

#[derive(Debug)]
struct Directory {
    by_name: HashMap<Username, UserHandle>,
    next_named_id: u64,
}

impl InMemoryUserStore {
    /// Store holding only the default player.
    #[must_use]
    pub fn new(balances: StartingBalances) -> Self {
        let store = Self::without_default(balances);
        store.get_or_create_default();
        store
    }

    /// Store with no players; the default one is created on first request.
    #[must_use]
    pub fn without_default(balances: StartingBalances) -> Self {
        Self {
            users: RwLock::new(Directory {
                by_name: HashMap::new(),
                next_named_id: FIRST_NAMED_USER_ID,
            }),
            balances,
        }
    }

    /// Number of stored players, including the default one once created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().by_name.len()
    }

    /// Whether no player has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().by_name.is_empty()
    }

    fn get_or_insert(&self, username: Username, currency: u64) -> UserHandle {
        if let Some(existing) = self.users.read().by_name.get(&username) {
            return existing.clone();
        }

        let mut guard = self.users.write();
        let Directory {
            by_name,
            next_named_id,
        } = &mut *guard;
        by_name
            .entry(username)
            .or_insert_with_key(|name| {
                let id = if name.is_default() {
                    DEFAULT_USER_ID
                } else {
                    let assigned = *next_named_id;
                    *next_named_id = assigned.saturating_add(1);
                    assigned
                };
                debug!(username = %name, id, "creating player");
                UserHandle::new(User::new(UserId::new(id), name.clone(), currency))
            })
            .clone()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(StartingBalances::default())
    }
}

impl UserStore for InMemoryUserStore {
    fn get(&self, username: &Username) -> Option<UserHandle> {
        self.users.read().by_name.get(username).cloned()
    }

    fn get_or_create_default(&self) -> UserHandle {
        self.get_or_insert(Username::default_user(), self.balances.default_user)
    }

    fn create(&self, username: Username) -> UserHandle {
        self.get_or_insert(username, self.balances.new_user)
    }
}
