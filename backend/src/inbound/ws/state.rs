//! Shared WebSocket adapter state.
//!
//! Sessions depend on the driving ports rather than concrete services so the
//! adapter can run against test doubles.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use crate::domain::ports::{GachaCommand, GachaQuery};
use crate::inbound::ws::outbound_queue::DEFAULT_QUEUE_CAPACITY;

/// Origins accepted on the WebSocket upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*`: any origin, including a missing header.
    #[default]
    Any,
    /// Exact `scheme://host[:port]` origins.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Build from configuration entries; a `*` entry allows everything.
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = Vec::new();
        for entry in entries {
            let trimmed = entry.as_ref().trim();
            if trimmed == "*" {
                return Self::Any;
            }
            if !trimmed.is_empty() {
                origins.push(trimmed.trim_end_matches('/').to_owned());
            }
        }
        Self::List(origins)
    }
}

/// Dependency bundle for WebSocket sessions.
#[derive(Clone)]
pub struct WsState {
    /// State-changing use-cases.
    pub gacha: Arc<dyn GachaCommand>,
    /// Read-only use-cases.
    pub gacha_query: Arc<dyn GachaQuery>,
    /// Origins accepted on upgrade.
    pub allowed_origins: AllowedOrigins,
    /// Per-session outbound queue capacity.
    pub queue_capacity: usize,
    /// Outbound messages dropped across all sessions.
    pub dropped_messages: Arc<AtomicU64>,
}

impl WsState {
    /// Construct state from explicit port implementations, allowing any
    /// origin and using the default queue capacity.
    #[must_use]
    pub fn new(gacha: Arc<dyn GachaCommand>, gacha_query: Arc<dyn GachaQuery>) -> Self {
        Self {
            gacha,
            gacha_query,
            allowed_origins: AllowedOrigins::Any,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dropped_messages: Arc::default(),
        }
    }

    /// Replace the origin allow-list.
    #[must_use]
    pub fn with_allowed_origins(mut self, allowed_origins: AllowedOrigins) -> Self {
        self.allowed_origins = allowed_origins;
        self
    }

    /// Replace the per-session queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec!["*"], AllowedOrigins::Any)]
    #[case(vec!["http://localhost:3000", "*"], AllowedOrigins::Any)]
    #[case(
        vec![" https://play.example/ ", ""],
        AllowedOrigins::List(vec!["https://play.example".to_owned()])
    )]
    #[case(vec![], AllowedOrigins::List(Vec::new()))]
    fn builds_allow_list_from_entries(#[case] entries: Vec<&str>, #[case] expected: AllowedOrigins) {
        assert_eq!(AllowedOrigins::from_entries(entries), expected);
    }
}
