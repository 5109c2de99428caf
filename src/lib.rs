// Export modules for library usage
pub mod analysis;
pub mod cleanup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod deployment;
pub mod errors;
pub mod flows;
pub mod formatting;
pub mod observability;
pub mod output;
pub mod reconcile;
pub mod references;
pub mod remote;
pub mod testkit;

// Re-export commonly used types
pub use crate::analysis::{build_analysis, AnalysisResult, ReferenceDetail, WorkflowAnalysis};
pub use crate::config::{load_config, AppConfig, ConnectionReferenceSettings, PlatformSettings};
pub use crate::core::{Binding, ClientData, NamingPolicy, ProcessingStats, Workflow};
pub use crate::errors::{ConnRefError, ErrorCode};
pub use crate::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::remote::{DataverseClient, Transport};
