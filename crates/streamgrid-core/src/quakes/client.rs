//! `QuakeClient` - fetches the Met Office earthquake page.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::{Quake, parse_quake_page};

/// Reykjanes peninsula earthquake page.
pub const DEFAULT_QUAKES_URL: &str =
    "https://en.vedur.is/earthquakes-and-volcanism/earthquakes/reykjanespeninsula/";

/// Sent unless the builder overrides it. The Met Office serves the table to
/// browser-like agents.
const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; streamgrid/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Earthquake page client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct QuakeClient {
    /// HTTP client (reqwest, gzip enabled).
    http_client: Client,
    /// Page carrying the `VI.quakeInfo` table.
    page_url: Url,
}

/// Builder for `QuakeClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct QuakeClientBuilder {
    page_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl QuakeClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            page_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the page URL (another region, or wiremock in tests).
    #[must_use]
    pub fn page_url(mut self, url: Url) -> Self {
        self.page_url = Some(url);
        self
    }

    /// Overrides the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the default URL fails to parse or the
    /// `reqwest::Client` build fails.
    pub fn build(self) -> Result<QuakeClient> {
        let page_url = if let Some(url) = self.page_url {
            url
        } else {
            Url::parse(DEFAULT_QUAKES_URL).context("invalid default quakes URL")?
        };
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(QuakeClient {
            http_client,
            page_url,
        })
    }
}

impl QuakeClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> QuakeClientBuilder {
        QuakeClientBuilder::new()
    }

    /// The page this client reads.
    #[must_use]
    pub const fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// Downloads the page body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body cannot be read.
    #[instrument(skip_all)]
    pub async fn fetch_page(&self) -> Result<String> {
        let response = self
            .http_client
            .get(self.page_url.clone())
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", self.page_url))?;

        let status = response.status();
        tracing::debug!(%status, url = %self.page_url, "Quake page response");
        if !status.is_success() {
            bail!("failed to fetch {}: HTTP {status}", self.page_url);
        }

        response
            .text()
            .await
            .context("failed to read quake page body")
    }

    /// Downloads the page and extracts every quake.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the page cannot be parsed.
    pub async fn fetch(&self) -> Result<Vec<Quake>> {
        let page = self.fetch_page().await?;
        parse_quake_page(&page)
    }
}
