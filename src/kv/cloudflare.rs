use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use tracing::{debug, error};
use url::Url;

use super::KvStore;
use crate::config::CloudflareKvSettings;
use crate::error::AdventError;

/// Workers KV namespace accessed through the Cloudflare REST API.
#[derive(Clone)]
pub struct CloudflareKv {
    client: reqwest::Client,
    settings: CloudflareKvSettings,
}

impl CloudflareKv {
    pub fn new(client: reqwest::Client, settings: CloudflareKvSettings) -> Self {
        Self { client, settings }
    }

    /// `{base}/accounts/{account}/storage/kv/namespaces/{ns}/values/{key}`
    ///
    /// The key is percent-encoded as a single path segment.
    fn value_url(&self, key: &str) -> Result<Url, AdventError> {
        let mut url = self.settings.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AdventError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.settings.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.settings.namespace_id.as_str(),
                "values",
                key,
            ]);
        Ok(url)
    }

    async fn fetch(&self, key: &str) -> Result<Option<String>, AdventError> {
        let url = self.value_url(key)?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.settings.api_token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!(key, "kv key not found");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(resp.text().await?)),
            status => {
                error!(key, %status, "kv read failed");
                Err(AdventError::UpstreamStatus(status))
            }
        }
    }
}

impl KvStore for CloudflareKv {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, AdventError>> {
        self.fetch(key).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn kv_for(server: &MockServer) -> CloudflareKv {
        let settings = CloudflareKvSettings {
            api_base: Url::parse(&format!("{}/client/v4", server.uri())).unwrap(),
            account_id: "acct".into(),
            api_token: "token".into(),
            namespace_id: "chat".into(),
        };
        CloudflareKv::new(reqwest::Client::new(), settings)
    }

    #[tokio::test]
    async fn reads_value_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/client/v4/accounts/acct/storage/kv/namespaces/chat/values/session-42",
            ))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"role":"user"}]"#))
            .mount(&server)
            .await;

        let value = kv_for(&server).get("session-42").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"role":"user"}]"#));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(kv_for(&server).get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = kv_for(&server).get("boom").await.unwrap_err();
        assert!(matches!(
            err,
            AdventError::UpstreamStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }

    #[test]
    fn key_is_encoded_as_single_segment() {
        let kv = CloudflareKv::new(
            reqwest::Client::new(),
            CloudflareKvSettings {
                api_base: Url::parse("https://api.cloudflare.com/client/v4/").unwrap(),
                account_id: "a".into(),
                api_token: "t".into(),
                namespace_id: "n".into(),
            },
        );
        let url = kv.value_url("a/b c").unwrap();
        assert_eq!(
            url.as_str(),
            concat!(
                "https://api.cloudflare.com/client/v4",
                "/accounts/a/storage/kv/namespaces/n/values/a%2Fb%20c"
            )
        );
    }
}
