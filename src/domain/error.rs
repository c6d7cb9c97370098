use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Credential check failed: unknown email or password mismatch.
    #[error("{0}")]
    Authentication(String),
    /// A business rule was violated; nothing was written.
    #[error("{0}")]
    BusinessRule(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn authentication(msg: impl Into<String>) -> Self {
        DomainError::Authentication(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        DomainError::BusinessRule(msg.into())
    }
}
