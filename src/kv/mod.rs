//! Key-value namespace holding per-session chat histories.
//!
//! - `cloudflare.rs`: Workers KV over the Cloudflare REST API
//! - `memory.rs`: in-process map for tests and unconfigured deployments

pub mod cloudflare;
pub mod memory;

use futures::future::BoxFuture;

use crate::error::AdventError;

pub use cloudflare::CloudflareKv;
pub use memory::MemoryKv;

/// Read access to a key-value namespace.
pub trait KvStore: Send + Sync {
    /// Fetch the raw value stored under `key`, `None` when the key is absent.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, AdventError>>;
}
