use std::collections::HashMap;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use super::KvStore;
use crate::error::AdventError;

#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().await.insert(key.into(), value.into());
    }
}

impl KvStore for MemoryKv {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, AdventError>> {
        async move { Ok(self.entries.read().await.get(key).cloned()) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_what_was_put() {
        let kv = MemoryKv::new();
        kv.put("session-1", "[1,2]").await;
        assert_eq!(kv.get("session-1").await.unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(kv.get("session-2").await.unwrap(), None);
    }
}
