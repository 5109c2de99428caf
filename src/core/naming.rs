//! Naming of shared connection references.
//!
//! The logical name depends only on the prefix, the provider and the workflow
//! id, so repeated runs converge on the same record.

/// Keep only alphanumerics and `_`.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    prefix: String,
}

impl NamingPolicy {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `lower("{prefix}_{provider}_{sanitize(workflow_id)}")`
    pub fn logical_name(&self, provider: &str, workflow_id: &str) -> String {
        format!("{}_{}_{}", self.prefix, provider, sanitize(workflow_id)).to_lowercase()
    }

    /// `{prefix}_{provider}_{workflow_id}`, unsanitized.
    pub fn display_name(&self, provider: &str, workflow_id: &str) -> String {
        format!("{}_{}_{}", self.prefix, provider, workflow_id)
    }
}
