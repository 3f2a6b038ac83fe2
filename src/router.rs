use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AdventError;
use crate::handlers::chat_history::{chat_history_handler, chat_history_preflight};
use crate::handlers::health::health_handler;
use crate::health::HealthChecker;
use crate::kv::{CloudflareKv, KvStore, MemoryKv};
use crate::middleware::cors::open_cors;
use crate::supabase::SupabaseClient;

#[derive(Clone)]
pub struct AdventState {
    pub kv: Arc<dyn KvStore>,
    pub health: Arc<HealthChecker>,
}

impl AdventState {
    pub fn new(kv: Arc<dyn KvStore>, health: HealthChecker) -> Self {
        Self {
            kv,
            health: Arc::new(health),
        }
    }

    /// Wire the KV namespace and health probes described by `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self, AdventError> {
        let client = crate::http::build_client(cfg)?;

        let kv: Arc<dyn KvStore> = match cfg.cloudflare_kv() {
            Some(settings) => {
                info!(namespace = %settings.namespace_id, "chat history backed by Cloudflare KV");
                Arc::new(CloudflareKv::new(client.clone(), settings))
            }
            None => {
                warn!("Cloudflare KV not configured; chat history uses an empty in-memory store");
                Arc::new(MemoryKv::new())
            }
        };

        let supabase = cfg
            .supabase()
            .map(|settings| SupabaseClient::new(client, settings));
        if supabase.is_none() {
            warn!("Supabase not configured; backend health probes will report errors");
        }

        Ok(Self::new(kv, HealthChecker::from_config(cfg, supabase)))
    }
}

pub fn advent_router(state: AdventState) -> Router {
    let chat = Router::new()
        .route(
            "/api/chat-history",
            get(chat_history_handler).options(chat_history_preflight),
        )
        .layer(middleware::from_fn(open_cors));

    Router::new()
        .merge(chat)
        .route("/api/health", get(health_handler))
        .with_state(state)
}
