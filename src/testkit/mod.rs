//! Testing infrastructure.
//!
//! - **[`MockTransport`]**: scripted responses keyed by method and URL
//!   fragment, with every request recorded for later assertions
//! - **[`helpers`]**: factories for workflow and reference records, client
//!   data blobs and configurations
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use connref::remote::Method;
//! use connref::testkit::{helpers, MockTransport};
//!
//! let mock = MockTransport::new();
//! mock.on(Method::Get, "workflows?fetchXml", helpers::page(vec![]));
//! let client = mock.client();
//! // ... run a command against `client`, then inspect `mock.requests()`
//! ```

pub mod helpers;
pub mod mock_transport;

pub use mock_transport::{MockTransport, TEST_BASE_URL};
