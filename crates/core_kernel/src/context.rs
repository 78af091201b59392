//! Request-scoped context
//!
//! Every billing and reporting operation runs against exactly one scheme.
//! The scheme selection travels with the request as an explicit value
//! passed into each service call, never as ambient global state.

use serde::{Deserialize, Serialize};

use crate::identifiers::SchemeId;

/// Context for a single request against one strata scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The scheme all fetches and writes are scoped to
    pub scheme_id: SchemeId,
    /// User or system that initiated the operation
    pub initiated_by: Option<String>,
    /// Correlation ID for tracing
    pub correlation_id: Option<String>,
}

impl RequestContext {
    /// Creates a context scoped to a scheme
    pub fn for_scheme(scheme_id: SchemeId) -> Self {
        Self {
            scheme_id,
            initiated_by: None,
            correlation_id: None,
        }
    }

    /// Sets the initiating user
    pub fn initiated_by(mut self, user: impl Into<String>) -> Self {
        self.initiated_by = Some(user.into());
        self
    }

    /// Sets the correlation ID
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let scheme = SchemeId::new();
        let ctx = RequestContext::for_scheme(scheme)
            .initiated_by("manager@example.com")
            .with_correlation_id("req-42");

        assert_eq!(ctx.scheme_id, scheme);
        assert_eq!(ctx.initiated_by.as_deref(), Some("manager@example.com"));
        assert_eq!(ctx.correlation_id.as_deref(), Some("req-42"));
    }
}
