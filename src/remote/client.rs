use super::transport::{Request, Response, Transport};
use crate::errors::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

pub const API_PATH: &str = "api/data/v9.2";

/// One page of an OData collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub value: Vec<Value>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Client for the Dataverse Web API.
///
/// Constructed once per run and passed by reference to every component.
pub struct DataverseClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl DataverseClient {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API endpoint such as `workflows(<id>)`.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_PATH,
            endpoint.trim_start_matches('/')
        )
    }

    /// Fetch a single page. `url` is absolute (an `api_url` or a next link).
    pub fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self.send(Request::get(url))?.into_result()?;
        let page: Page = response.parse_json()?;
        trace!(records = page.value.len(), has_next = page.next_link.is_some(), "fetched page");
        Ok(page)
    }

    /// Fetch every record, following `@odata.nextLink` until it is absent.
    pub fn fetch_all(&self, url: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages = 0usize;

        while let Some(url) = next.take().filter(|u| !u.is_empty()) {
            let page = self.fetch_page(&url)?;
            records.extend(page.value);
            next = page.next_link;
            pages += 1;
        }

        debug!(pages, records = records.len(), "collection fetched");
        Ok(records)
    }

    pub fn get_json(&self, url: &str) -> Result<Value> {
        self.send(Request::get(url))?.into_result()?.parse_json()
    }

    /// POST a JSON body; a non-success status is returned as
    /// [`ConnRefError::Remote`](crate::errors::ConnRefError::Remote).
    pub fn post_json(&self, url: &str, body: Value) -> Result<Response> {
        self.send(Request::post(url, body))?.into_result()
    }

    pub fn patch_json(&self, url: &str, body: Value) -> Result<Response> {
        self.send(Request::patch(url, body))?.into_result()
    }

    pub fn delete(&self, url: &str) -> Result<Response> {
        self.send(Request::delete(url))?.into_result()
    }

    fn send(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method, url = %request.url, "request");
        let response = self.transport.send(&request)?;
        trace!(status = response.status, "response");
        Ok(response)
    }
}
