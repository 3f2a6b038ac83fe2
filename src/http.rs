use std::time::Duration;

use crate::config::Config;
use crate::error::AdventError;

const USER_AGENT: &str = concat!("advent-edge/", env!("CARGO_PKG_VERSION"));

/// Outbound HTTP client shared by the KV and Supabase clients.
pub fn build_client(cfg: &Config) -> Result<reqwest::Client, AdventError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15));
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}
