//! Test utilities for GraphQL transports.
//!
//! [`MockTransport`] answers queries from a closure and records every call,
//! so resolver tests can assert on round trips without network access.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use serde_json::Value;

use crate::graphql::GraphQLTransport;

type Responder = dyn Fn(&str, &Value) -> Result<Value> + Send + Sync;

/// A query observed by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub query: String,
    pub variables: Value,
}

/// Transport that answers from a closure and records each query.
///
/// # Example
///
/// ```ignore
/// let transport = MockTransport::new(|_query, vars| Ok(json!({ "r0": null })));
/// transport.query("query { r0: ... }", json!({}))?;
/// assert_eq!(transport.calls().len(), 1);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All queries seen so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().clone()
    }

    /// Number of queries whose text contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.query.contains(needle))
            .count()
    }
}

impl GraphQLTransport for MockTransport {
    fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let result = (self.responder)(query, &variables);
        self.calls.lock().push(RecordedQuery {
            query: query.to_string(),
            variables,
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_records_calls() {
        let transport = MockTransport::new(|query, _| Ok(json!({ "echo": query })));
        let data = transport.query("query { a }", json!({ "x": 1 })).unwrap();
        assert_eq!(data["echo"], "query { a }");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].variables["x"], 1);
        assert_eq!(transport.count_matching("{ a }"), 1);
    }
}
