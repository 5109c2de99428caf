//! Domain types shared by every command.

pub mod client_data;
pub mod naming;
pub mod reference;
pub mod stats;
pub mod workflow;

pub use client_data::{Binding, ClientData};
pub use naming::{sanitize, NamingPolicy};
pub use reference::SharedConnectionReference;
pub use stats::ProcessingStats;
pub use workflow::{SkipReason, Workflow};
