//! HTTP implementation of the game service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::api::{
    AnswerForm, AnswerResponse, BeginForm, BeginPage, CancelForm, CancelResponse, Endpoint,
    GameService, parse_begin_page,
};
use crate::error::{Error, Result};
use crate::types::Language;

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser user agent sent with every request; the service rejects unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Akinator HTTP client.
///
/// # Example
///
/// ```no_run
/// use akinator_client::{AkinatorClient, Language};
///
/// # fn example() -> akinator_client::Result<()> {
/// let client = AkinatorClient::builder()
///     .language(Language::French)
///     .build()?;
/// assert_eq!(client.base_url().as_str(), "https://fr.akinator.com/");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AkinatorClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    /// HTTP client.
    http: reqwest::Client,
    /// Language root, always ending in `/`.
    base_url: Url,
    /// Language the client was built for.
    language: Language,
    /// Request timeout.
    timeout: Duration,
}

impl AkinatorClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for `language` with default settings.
    pub fn new(language: Language) -> Result<Self> {
        Self::builder().language(language).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the language.
    pub fn language(&self) -> Language {
        self.inner.language
    }

    /// Build the URL of an endpoint.
    pub fn url(&self, endpoint: Endpoint) -> Result<Url> {
        self.inner
            .base_url
            .join(endpoint.path())
            .map_err(Error::from)
    }

    /// POST a form and return the successful response.
    async fn post_form<F>(&self, endpoint: Endpoint, form: &F) -> Result<reqwest::Response>
    where
        F: Serialize + ?Sized,
    {
        let url = self.url(endpoint)?;
        trace!(url = %url, "POST");

        let response = self
            .inner
            .http
            .post(url)
            .form(form)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("{} returned HTTP {}", endpoint.path(), status),
            });
        }

        Ok(response)
    }

    /// POST a form and decode a JSON body.
    async fn post_form_json<F, T>(&self, endpoint: Endpoint, form: &F) -> Result<T>
    where
        F: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let body = self.post_form(endpoint, form).await?.text().await?;
        if body.trim().is_empty() {
            return Err(Error::MalformedResponse(format!(
                "empty body from {}",
                endpoint.path()
            )));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GameService for AkinatorClient {
    async fn begin(&self, form: &BeginForm) -> Result<BeginPage> {
        let html = self.post_form(Endpoint::Game, form).await?.text().await?;
        let page = parse_begin_page(&html);
        debug!(
            has_session = page.session.is_some(),
            has_signature = page.signature.is_some(),
            "Begin page received"
        );
        Ok(page)
    }

    async fn answer(&self, form: &AnswerForm) -> Result<AnswerResponse> {
        self.post_form_json(Endpoint::Answer, form).await
    }

    async fn cancel(&self, form: &CancelForm) -> Result<CancelResponse> {
        self.post_form_json(Endpoint::Back, form).await
    }
}

/// Builder for creating an AkinatorClient.
#[derive(Debug)]
pub struct ClientBuilder {
    language: Language,
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            language: Language::default(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the game language.
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Replace the language root (e.g. to point at a test server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AkinatorClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| self.language.base_url());

        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/html;q=0.9, */*;q=0.8"),
        );

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| BROWSER_USER_AGENT.to_string());

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(AkinatorClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                language: self.language,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
