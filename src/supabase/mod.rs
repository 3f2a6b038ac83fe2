//! Minimal client for the hosted Supabase project (PostgREST, Auth, Storage).

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::config::SupabaseSettings;
use crate::error::AdventError;

/// Table queried by the database probe; any readable table works.
const PROBE_TABLE: &str = "calendars";

#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base: Url,
    service_role_key: String,
}

impl SupabaseClient {
    pub fn new(client: reqwest::Client, settings: SupabaseSettings) -> Self {
        Self {
            client,
            base: settings.url,
            service_role_key: settings.service_role_key,
        }
    }

    /// PostgREST round trip: `GET /rest/v1/calendars?select=id&limit=1`.
    pub async fn probe_database(&self) -> Result<(), AdventError> {
        let mut url = self.endpoint(&["rest", "v1", PROBE_TABLE])?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("limit", "1");
        self.get_ok(url).await
    }

    /// `GET /auth/v1/health`
    pub async fn probe_auth(&self) -> Result<(), AdventError> {
        let url = self.endpoint(&["auth", "v1", "health"])?;
        self.get_ok(url).await
    }

    /// `GET /storage/v1/bucket`
    pub async fn probe_storage(&self) -> Result<(), AdventError> {
        let url = self.endpoint(&["storage", "v1", "bucket"])?;
        self.get_ok(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AdventError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AdventError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn auth_headers(&self) -> Result<HeaderMap, AdventError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.service_role_key)
            .map_err(|_| AdventError::NotConfigured("a valid SUPABASE_SERVICE_ROLE_KEY"))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_role_key))
            .map_err(|_| AdventError::NotConfigured("a valid SUPABASE_SERVICE_ROLE_KEY"))?;
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get_ok(&self, url: Url) -> Result<(), AdventError> {
        let resp = self
            .client
            .get(url.clone())
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let status = resp.status();
        debug!(url = %url, %status, "supabase probe response");
        if status.is_success() {
            Ok(())
        } else {
            Err(AdventError::UpstreamStatus(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SupabaseClient {
        SupabaseClient::new(
            reqwest::Client::new(),
            SupabaseSettings {
                url: Url::parse(&server.uri()).unwrap(),
                service_role_key: "srk".into(),
            },
        )
    }

    #[tokio::test]
    async fn database_probe_queries_one_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/calendars"))
            .and(query_param("select", "id"))
            .and(query_param("limit", "1"))
            .and(header("apikey", "srk"))
            .and(header("authorization", "Bearer srk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).probe_database().await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/bucket"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).probe_storage().await.unwrap_err();
        assert!(matches!(
            err,
            AdventError::UpstreamStatus(StatusCode::SERVICE_UNAVAILABLE)
        ));
    }

    #[tokio::test]
    async fn auth_probe_hits_health_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).probe_auth().await.unwrap();
    }
}
