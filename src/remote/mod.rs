//! Remote data access for the Dataverse Web API.
//!
//! - [`transport`]: the `Transport` seam plus request/response types
//! - [`http`]: blocking `reqwest` implementation
//! - [`client`]: URL building, pagination and single-record calls
//! - [`auth`]: access token acquisition
//! - [`fetchxml`]: query builders

pub mod auth;
pub mod client;
pub mod fetchxml;
pub mod http;
pub mod transport;

pub use client::{DataverseClient, Page, API_PATH};
pub use http::HttpTransport;
pub use transport::{Method, Request, Response, Transport};
