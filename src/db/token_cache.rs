// src/db/token_cache.rs

use std::sync::Arc;
use tokio::sync::RwLock;

// Guarda o bearer token do Sankhya em memória.
// Não existe TTL: o token vale até um 401/403 chamar `invalidate`.
// Clonar compartilha o mesmo valor (Arc).
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn set(&self, token: String) {
        *self.inner.write().await = Some(token);
    }

    pub async fn invalidate(&self) {
        *self.inner.write().await = None;
    }
}
