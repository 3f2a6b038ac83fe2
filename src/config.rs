use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::providers::Serialized;
use figment::value::{Dict, Map, Value};
use figment::{Figment, Metadata, Profile, Provider};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AdventError;

pub const DEFAULT_CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Environment keys recognised by [`Config::load`], read as `LISTEN_ADDR`, `LOGLEVEL`, ...
const ENV_KEYS: &[&str] = &[
    "listen_addr",
    "loglevel",
    "supabase_url",
    "supabase_service_role_key",
    "supabase_anon_key",
    "stripe_secret_key",
    "cloudflare_api_base",
    "cloudflare_account_id",
    "cloudflare_api_token",
    "chat_history_namespace_id",
    "photos_dir",
    "proxy",
];

/// Runtime configuration shared by the server and the maintenance CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub loglevel: String,

    pub supabase_url: Option<Url>,
    pub supabase_service_role_key: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub stripe_secret_key: Option<String>,

    pub cloudflare_api_base: Url,
    pub cloudflare_account_id: Option<String>,
    pub cloudflare_api_token: Option<String>,
    pub chat_history_namespace_id: Option<String>,

    pub photos_dir: PathBuf,
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            loglevel: "info".to_string(),
            supabase_url: None,
            supabase_service_role_key: None,
            supabase_anon_key: None,
            stripe_secret_key: None,
            cloudflare_api_base: Url::parse(DEFAULT_CLOUDFLARE_API_BASE)
                .expect("default Cloudflare API base is a valid URL"),
            cloudflare_account_id: None,
            cloudflare_api_token: None,
            chat_history_namespace_id: None,
            photos_dir: PathBuf::from("public/photos"),
            proxy: None,
        }
    }
}

impl Config {
    /// Extract configuration from the process environment over the defaults.
    pub fn load() -> Result<Self, AdventError> {
        Self::figment().extract().map_err(AdventError::from)
    }

    /// Load a dotenv-style file (e.g. `.env.test`) into the environment, then extract.
    pub fn from_env_file(path: &Path) -> Result<Self, AdventError> {
        dotenvy::from_path(path).map_err(|e| AdventError::EnvFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::load()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(StringEnv::new(ENV_KEYS))
    }

    /// Cloudflare KV settings, present only when every piece is configured.
    pub fn cloudflare_kv(&self) -> Option<CloudflareKvSettings> {
        Some(CloudflareKvSettings {
            api_base: self.cloudflare_api_base.clone(),
            account_id: non_empty(self.cloudflare_account_id.as_deref())?.to_string(),
            api_token: non_empty(self.cloudflare_api_token.as_deref())?.to_string(),
            namespace_id: non_empty(self.chat_history_namespace_id.as_deref())?.to_string(),
        })
    }

    /// Supabase settings, present only when both URL and service-role key are set.
    pub fn supabase(&self) -> Option<SupabaseSettings> {
        Some(SupabaseSettings {
            url: self.supabase_url.clone()?,
            service_role_key: non_empty(self.supabase_service_role_key.as_deref())?.to_string(),
        })
    }
}

/// Environment provider that hands every value over as a string.
///
/// Every setting is string-typed (URLs, addresses, paths, secrets), so no
/// type inference is applied: `0123456789` stays `"0123456789"`. Blank
/// values count as unset.
pub struct StringEnv {
    keys: &'static [&'static str],
}

impl StringEnv {
    pub fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }
}

impl Provider for StringEnv {
    fn metadata(&self) -> Metadata {
        Metadata::named("environment variable(s)")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        for key in self.keys {
            let Ok(value) = std::env::var(key.to_ascii_uppercase()) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            dict.insert(key.to_string(), Value::from(value));
        }
        Ok(Profile::Default.collect(dict))
    }
}

#[derive(Debug, Clone)]
pub struct CloudflareKvSettings {
    pub api_base: Url,
    pub account_id: String,
    pub api_token: String,
    pub namespace_id: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: Url,
    pub service_role_key: String,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
