//! Scripted in-memory [`Transport`].
//!
//! Routes match on method plus a URL substring. One-shot routes are consumed
//! in registration order and take precedence; otherwise the most recently
//! registered persistent route wins. Unmatched requests get a `404` whose
//! body names the request, which surfaces as a remote error in the code
//! under test.
//!
//! The state sits behind `Arc<RwLock<_>>` so a clone handed to
//! [`DataverseClient`] and the one kept by the test observe the same
//! requests.

use crate::errors::Result;
use crate::remote::{DataverseClient, Method, Request, Response, Transport};
use std::sync::{Arc, RwLock};

pub const TEST_BASE_URL: &str = "https://test.crm.dynamics.com";

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    pattern: String,
    response: Response,
    once: bool,
    consumed: bool,
}

#[derive(Debug, Default)]
struct State {
    routes: Vec<Route>,
    requests: Vec<Request>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<RwLock<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self, method: Method, pattern: &str, response: Response, once: bool) {
        self.state.write().expect("Lock poisoned").routes.push(Route {
            method,
            pattern: pattern.to_string(),
            response,
            once,
            consumed: false,
        });
    }

    /// Answer every matching request with `response`.
    pub fn on(&self, method: Method, pattern: &str, response: Response) -> &Self {
        self.add(method, pattern, response, false);
        self
    }

    /// Answer the next matching request only.
    pub fn on_once(&self, method: Method, pattern: &str, response: Response) -> &Self {
        self.add(method, pattern, response, true);
        self
    }

    /// A client over a clone of this transport rooted at [`TEST_BASE_URL`].
    pub fn client(&self) -> DataverseClient {
        DataverseClient::new(TEST_BASE_URL, Box::new(self.clone()))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.read().expect("Lock poisoned").requests.clone()
    }

    pub fn requests_matching(&self, method: Method, pattern: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url.contains(pattern))
            .collect()
    }

    pub fn count(&self, method: Method, pattern: &str) -> usize {
        self.requests_matching(method, pattern).len()
    }

    /// Number of POST/PATCH/DELETE requests seen.
    pub fn mutating_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method.is_mutating())
            .count()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<Response> {
        let mut state = self.state.write().expect("Lock poisoned");
        state.requests.push(request.clone());

        let matches =
            |route: &Route| route.method == request.method && request.url.contains(&route.pattern);

        if let Some(route) = state
            .routes
            .iter_mut()
            .find(|route| route.once && !route.consumed && matches(route))
        {
            route.consumed = true;
            return Ok(route.response.clone());
        }

        let persistent = state
            .routes
            .iter()
            .rev()
            .find(|route| !route.once && matches(route))
            .map(|route| route.response.clone());

        Ok(persistent.unwrap_or_else(|| {
            Response::new(
                404,
                format!("no mock route for {} {}", request.method, request.url),
            )
        }))
    }
}
