//! HTTP transport and page fetching
//!
//! All network access goes through the [`HttpTransport`] trait so the
//! adapter core can run against a canned transport in tests. The
//! production implementation is a blocking `reqwest` client; one request
//! blocks until the transport's default behavior resolves it, with no
//! retry or backoff on top.

use std::collections::VecDeque;
use std::sync::Mutex;

use url::Url;

use crate::config::MoosendConfig;
use crate::error::{AdapterError, Result};
use crate::logging::{LogSink, Severity};
use crate::wire::{Envelope, SubscriberPage};

/// Blocking HTTP transport used by the adapter
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request and return the response body
    fn get(&self, url: &Url) -> Result<String>;

    /// Issue a POST request with a JSON body and return the response body
    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<String>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn get(&self, url: &Url) -> Result<String> {
        (**self).get(url)
    }

    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<String> {
        (**self).post_json(url, body)
    }
}

/// Production transport backed by `reqwest::blocking`
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default client settings
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<String> {
        Ok(self.client.get(url.clone()).send()?.text()?)
    }

    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<String> {
        Ok(self.client.post(url.clone()).json(body).send()?.text()?)
    }
}

/// One request captured by a [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method, `GET` or `POST`
    pub method: &'static str,
    /// Full request URL including query parameters
    pub url: Url,
    /// JSON body for POST requests
    pub body: Option<serde_json::Value>,
}

/// Offline transport that replays canned response bodies in order and
/// records every request it receives. Used by the test suite and useful
/// for dry-running the adapter without network access.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    /// Create a transport with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response body
    pub fn push_response(&self, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(body.into());
    }

    /// Snapshot of every request issued so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_response(&self, request: RecordedRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| {
                AdapterError::Configuration("scripted transport ran out of responses".to_string())
            })
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &Url) -> Result<String> {
        self.next_response(RecordedRequest {
            method: "GET",
            url: url.clone(),
            body: None,
        })
    }

    fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<String> {
        self.next_response(RecordedRequest {
            method: "POST",
            url: url.clone(),
            body: Some(body.clone()),
        })
    }
}

/// Fetches one page of subscribers per call
pub struct PageFetcher<'a> {
    config: &'a MoosendConfig,
    transport: &'a dyn HttpTransport,
    log: &'a dyn LogSink,
}

impl<'a> PageFetcher<'a> {
    /// Bind a fetcher to its configuration, transport, and log sink
    pub fn new(
        config: &'a MoosendConfig,
        transport: &'a dyn HttpTransport,
        log: &'a dyn LogSink,
    ) -> Self {
        Self {
            config,
            transport,
            log,
        }
    }

    /// Fetch one 1-indexed page of subscribed members.
    ///
    /// A failed envelope (non-zero code) is logged at error severity and
    /// yields `Ok(None)`; the current scan stops there. Transport and
    /// decode failures propagate.
    pub fn fetch_page(&self, page: u32) -> Result<Option<(SubscriberPage, u32)>> {
        let url = self.page_url(page)?;
        self.log
            .log(Severity::Debug, &format!("fetching subscriber page {page}"));

        let body = self.transport.get(&url)?;
        let envelope: Envelope<SubscriberPage> = serde_json::from_str(&body)?;

        if !envelope.is_ok() {
            self.log.log(Severity::Error, envelope.error_message());
            return Ok(None);
        }

        let context = envelope.context.ok_or_else(|| AdapterError::Api {
            code: 0,
            message: "success envelope carried no Context".to_string(),
        })?;
        let total_pages = context.paging.total_page_count;
        Ok(Some((context, total_pages)))
    }

    fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = self.config.api_url(&format!(
            "lists/{}/subscribers/Subscribed.json",
            self.config.list_id
        ))?;
        url.query_pairs_mut()
            .append_pair("Page", &page.to_string())
            .append_pair("PageSize", &self.config.page_size.to_string());
        Ok(url)
    }
}
