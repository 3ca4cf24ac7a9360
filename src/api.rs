//! Synchronous client for the GINI index endpoint of the **World Bank Indicators API (v2)**.
//!
//! One lookup is one `GET {base_url}/{country}/indicator/SI.POV.GINI` request. The raw
//! response is handed to [`crate::interpret::parse`], so every outcome (including transport
//! failures) comes back as a [`FetchOutcome`] instead of an error.
//!
//! ### Notes
//! - No retries are performed; a failed request surfaces immediately.
//! - The request timeout defaults to 15s (see [`ClientConfig`]).
//!
//! Typical usage:
//! ```no_run
//! # use gini_rs::{Client, FetchOutcome, interpret};
//! let client = Client::default();
//! if let FetchOutcome::Success(records) = client.lookup("ARG") {
//!     let latest = interpret::select_latest(&records);
//!     println!("{:?}", latest);
//! }
//! ```
use crate::error::{FetchError, InvalidCountryCode, TransportError};
use crate::interpret;
use crate::models::{DateSpec, FetchOutcome, RawResponse};
use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2/en/country";
pub const GINI_INDICATOR: &str = "SI.POV.GINI";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings for [`Client`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Everything up to (excluding) the country code.
    pub base_url: String,
    pub indicator: String,
    pub date: DateSpec,
    pub per_page: u32,
    /// Total request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            indicator: GINI_INDICATOR.into(),
            date: DateSpec::default(),
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `GINI_BASE_URL`, `GINI_TIMEOUT_SECS` and `GINI_PER_PAGE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(url) = get("GINI_BASE_URL").filter(|s| !s.trim().is_empty()) {
            cfg.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = get("GINI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("invalid GINI_TIMEOUT_SECS: {:?}", secs))?;
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = get("GINI_PER_PAGE") {
            cfg.per_page = n
                .trim()
                .parse()
                .with_context(|| format!("invalid GINI_PER_PAGE: {:?}", n))?;
        }
        Ok(cfg)
    }
}

/// The network collaborator: fetch the raw indicator response for one country.
pub trait Fetch {
    fn fetch(&self, country_code: &str) -> Result<RawResponse, TransportError>;
}

/// Fetch and interpret in one step; never fails, every error is classified in the outcome.
pub fn lookup<F: Fetch + ?Sized>(fetcher: &F, country_code: &str) -> FetchOutcome {
    match fetcher.fetch(country_code) {
        Ok(raw) => {
            log::debug!("response status {} ({})", raw.status, raw.content_type);
            interpret::parse(&raw.body, &raw.content_type, raw.status)
        }
        Err(e) => {
            log::warn!("request for {} failed: {}", country_code, e);
            FetchOutcome::Failure(FetchError::from(e))
        }
    }
}

/// Trim, uppercase and check for exactly three ASCII letters.
pub fn normalize_country_code(input: &str) -> Result<String, InvalidCountryCode> {
    let code = input.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(InvalidCountryCode(input.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub config: ClientConfig,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default()).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(part: &str) -> String {
    percent_encoding::utf8_percent_encode(part.trim(), SAFE).to_string()
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout) // total request timeout
            .connect_timeout(config.timeout.min(Duration::from_secs(10))) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("gini_rs/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .context("build HTTP client")?;
        Ok(Self { config, http })
    }

    /// Client pointed at another API root (mock servers, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// Full request URL for a country.
    pub fn url_for(&self, country_code: &str) -> String {
        format!(
            "{}/{}/indicator/{}?format=json&date={}&per_page={}",
            self.config.base_url.trim_end_matches('/'),
            enc(country_code),
            enc(&self.config.indicator),
            self.config.date.to_query_param(),
            self.config.per_page
        )
    }

    /// Fetch and interpret the indicator series for `country_code`.
    pub fn lookup(&self, country_code: &str) -> FetchOutcome {
        lookup(self, country_code)
    }
}

impl Fetch for Client {
    fn fetch(&self, country_code: &str) -> Result<RawResponse, TransportError> {
        let url = self.url_for(country_code);
        log::debug!("GET {}", url);
        let resp = self.http.get(&url).send()?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        // Body reads are still bound by the client timeout.
        let body = resp.text()?;
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
