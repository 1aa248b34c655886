use async_trait::async_trait;
use dashmap::DashMap;

use crate::types::Token;

/// Storage of provider tokens keyed by session identifier.
///
/// Implementations must be safe to share between concurrently running
/// requests. A `put` replaces the whole record, so readers never observe a
/// half-updated token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Option<Token>;

    async fn put(&self, session_id: &str, token: Token);

    /// Removes the record. Deleting an unknown id is not an error.
    async fn delete(&self, session_id: &str);
}

/// Process-local token store.
///
/// Sessions live only as long as the process: a restart logs every user out.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, Token>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, session_id: &str) -> Option<Token> {
        self.tokens.get(session_id).map(|t| t.value().clone())
    }

    async fn put(&self, session_id: &str, token: Token) {
        self.tokens.insert(session_id.to_string(), token);
    }

    async fn delete(&self, session_id: &str) {
        self.tokens.remove(session_id);
    }
}
