use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::HealthProbe;
use crate::config::non_empty;
use crate::error::AdventError;
use crate::supabase::SupabaseClient;

#[derive(Debug, Clone, Copy)]
enum Target {
    Database,
    Auth,
    Storage,
}

/// Reachability of one Supabase service.
pub struct SupabaseProbe {
    target: Target,
    client: Option<Arc<SupabaseClient>>,
}

impl SupabaseProbe {
    pub fn database(client: Option<Arc<SupabaseClient>>) -> Self {
        Self {
            target: Target::Database,
            client,
        }
    }

    pub fn auth(client: Option<Arc<SupabaseClient>>) -> Self {
        Self {
            target: Target::Auth,
            client,
        }
    }

    pub fn storage(client: Option<Arc<SupabaseClient>>) -> Self {
        Self {
            target: Target::Storage,
            client,
        }
    }
}

impl HealthProbe for SupabaseProbe {
    fn name(&self) -> &'static str {
        match self.target {
            Target::Database => "database",
            Target::Auth => "auth",
            Target::Storage => "storage",
        }
    }

    fn check(&self) -> BoxFuture<'_, Result<(), AdventError>> {
        async move {
            let client = self
                .client
                .as_ref()
                .ok_or(AdventError::NotConfigured("Supabase"))?;
            match self.target {
                Target::Database => client.probe_database().await,
                Target::Auth => client.probe_auth().await,
                Target::Storage => client.probe_storage().await,
            }
        }
        .boxed()
    }
}

/// Presence of a required secret; never exposes the value.
pub struct SecretProbe {
    name: &'static str,
    env_key: &'static str,
    value: Option<String>,
}

impl SecretProbe {
    pub fn new(name: &'static str, env_key: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            env_key,
            value,
        }
    }
}

impl HealthProbe for SecretProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self) -> BoxFuture<'_, Result<(), AdventError>> {
        let result = match non_empty(self.value.as_deref()) {
            Some(_) => Ok(()),
            None => Err(AdventError::NotConfigured(self.env_key)),
        };
        futures::future::ready(result).boxed()
    }
}
