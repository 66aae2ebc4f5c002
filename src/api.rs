use crate::config::ConsoleSettings;
use crate::errors::{AppError, AppResult};
use crate::models::{Buyer, DashboardFigures, Record};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn fetch_registrants(&self, event_id: &str) -> AppResult<Vec<Record>>;
    async fn toggle_credential(&self, event_id: &str, user_id: &str) -> AppResult<()>;
    async fn fetch_dashboard(&self, event_id: &str) -> AppResult<DashboardFigures>;
    async fn fetch_product_buyers(&self, product_id: &str) -> AppResult<Vec<Buyer>>;
}

#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    http_client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpAdminApi {
    pub fn new(settings: &ConsoleSettings) -> AppResult<Self> {
        let base_url = Url::parse(settings.api_base_url.trim())
            .map_err(|error| AppError::Config(format!("invalid apiBaseUrl {:?}: {}", settings.api_base_url, error)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("apiBaseUrl {} cannot be a base URL", base_url)));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            token: settings.api_token.clone(),
        })
    }

    pub fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("apiBaseUrl {} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url) -> AppResult<reqwest::Response> {
        let mut request = self.http_client.request(method.clone(), url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Remote(describe_status(&method, &url, status)));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let body = self.send(Method::GET, url).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn describe_status(method: &Method, url: &Url, status: StatusCode) -> String {
    format!("{} {} returned {}", method, url.path(), status)
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn fetch_registrants(&self, event_id: &str) -> AppResult<Vec<Record>> {
        let url = self.endpoint(&["admin", "events", event_id, "inscricoes"])?;
        self.get_json(url).await
    }

    async fn toggle_credential(&self, event_id: &str, user_id: &str) -> AppResult<()> {
        let url = self.endpoint(&["admin", "events", event_id, "inscricoes", "credenciamento", user_id])?;
        self.send(Method::PUT, url).await?;
        Ok(())
    }

    async fn fetch_dashboard(&self, event_id: &str) -> AppResult<DashboardFigures> {
        let url = self.endpoint(&["admin", "events", event_id, "dashboard"])?;
        self.get_json(url).await
    }

    async fn fetch_product_buyers(&self, product_id: &str) -> AppResult<Vec<Buyer>> {
        let url = self.endpoint(&["admin", "loja", "produtos", product_id, "compradores"])?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::HttpAdminApi;
    use crate::config::ConsoleSettings;

    fn api(base: &str) -> HttpAdminApi {
        let settings = ConsoleSettings {
            api_base_url: base.to_string(),
            ..ConsoleSettings::default()
        };
        HttpAdminApi::new(&settings).expect("api")
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = api("https://host.example/api/")
            .endpoint(&["admin", "events", "ev-1", "inscricoes"])
            .expect("url");
        assert_eq!(url.as_str(), "https://host.example/api/admin/events/ev-1/inscricoes");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let url = api("https://host.example")
            .endpoint(&["admin", "events", "a/b c", "dashboard"])
            .expect("url");
        assert_eq!(url.path(), "/admin/events/a%2Fb%20c/dashboard");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let settings = ConsoleSettings {
            api_base_url: "not a url".to_string(),
            ..ConsoleSettings::default()
        };
        let err = HttpAdminApi::new(&settings).expect_err("invalid url");
        assert!(err.to_string().starts_with("CONFIG:"));
    }
}
