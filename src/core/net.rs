// src/core/net.rs

// Search-form client: GET the form (session cookie + anti-forgery token), then POST the query.

use std::sync::LazyLock;
use std::thread;

use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::header::REFERER;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::html::sel;
use crate::config::consts::SEARCH_TYPE;
use crate::config::options::FetchOptions;
use crate::error::{Result, ScrapeError};

const TOKEN_FIELD: &str = "__RequestVerificationToken";

static TOKEN_INPUT: LazyLock<Selector> =
    LazyLock::new(|| sel(r#"input[name="__RequestVerificationToken"]"#));

// Token embedded in script (`"__RequestVerificationToken": "..."`) or a
// malformed input the DOM parse missed.
static TOKEN_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"__RequestVerificationToken["']?\s*(?:value\s*=|:)\s*["']([^"']+)["']"#)
        .expect("valid regex")
});

pub struct FacilityClient {
    http: Client,
    opts: FetchOptions,
}

impl FacilityClient {
    pub fn new(opts: FetchOptions) -> Result<Self> {
        opts.validate()?;
        let http = Client::builder()
            .timeout(opts.timeout)
            .connect_timeout(opts.timeout)
            .cookie_store(true)
            .user_agent(opts.user_agent.clone())
            .build()
            .map_err(ScrapeError::Network)?;
        Ok(Self { http, opts })
    }

    /// Submit a name search and return the raw results page.
    ///
    /// Transport failures are retried up to `retries` times with a doubling
    /// backoff; anything the server actually answered is returned as-is.
    pub fn fetch(&self, query: &str) -> Result<String> {
        let q = query.trim();
        if q.is_empty() {
            return Err(ScrapeError::InvalidQuery);
        }

        let mut attempt: u32 = 0;
        loop {
            match self.fetch_once(q) {
                Ok(body) => {
                    info!(query = q, bytes = body.len(), "search results received");
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < self.opts.retries => {
                    let wait = self.opts.backoff.saturating_mul(1u32 << attempt.min(16));
                    attempt += 1;
                    warn!(attempt, of = self.opts.retries, ?wait, error = %e, "search failed; retrying");
                    thread::sleep(wait);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn fetch_once(&self, q: &str) -> Result<String> {
        let url = self.opts.search_url();

        debug!(%url, "loading search form");
        let resp = self.http.get(&url).send().map_err(ScrapeError::Network)?;
        let form_page = read_body(resp, &url)?;

        let token = verification_token(&form_page);
        if token.is_none() {
            warn!("no anti-forgery token on the search form; posting without it");
        }

        let mut form: Vec<(&str, &str)> = vec![
            ("facilityName", q),
            ("FacilityTypeSelection", self.opts.facility_type.as_str()),
            ("OpenClosed_LicenseStatus", self.opts.license_status.as_str()),
            ("SearchType", SEARCH_TYPE),
        ];
        if let Some(t) = token.as_deref() {
            form.push((TOKEN_FIELD, t));
        }

        debug!(%url, query = q, "posting search");
        let resp = self
            .http
            .post(&url)
            .header(REFERER, url.as_str())
            .form(&form)
            .send()
            .map_err(ScrapeError::Network)?;
        read_body(resp, &url)
    }
}

fn read_body(resp: Response, url: &str) -> Result<String> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::UnexpectedResponse {
            url: s!(url),
            reason: format!("HTTP {status}"),
        });
    }
    let body = resp.text().map_err(ScrapeError::Network)?;
    if body.trim().is_empty() {
        return Err(ScrapeError::UnexpectedResponse {
            url: s!(url),
            reason: s!("empty body"),
        });
    }
    Ok(body)
}

/// Anti-forgery token from the search form page, if any.
pub fn verification_token(page: &str) -> Option<String> {
    let doc = Html::parse_document(page);
    let from_input = doc
        .select(&TOKEN_INPUT)
        .filter_map(|el| el.value().attr("value"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(String::from);
    from_input.or_else(|| {
        TOKEN_LOOSE
            .captures(page)
            .and_then(|c| c.get(1))
            .map(|m| s!(m.as_str()))
    })
}
