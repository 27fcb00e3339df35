use std::sync::Arc;

use anyhow::Result;
use serde_json::{Map, Value};
use sui_transport::GraphQLTransport;

use super::{aliased, run_query, NameResolver};
use crate::batch::{RequestKind, ResolutionRequest};
use crate::error::ResolutionError;
use crate::resolution::ResolutionMap;

/// Resolves names and types through `packageByName` / `typeByName`.
pub struct DirectResolver {
    transport: Arc<dyn GraphQLTransport>,
}

impl DirectResolver {
    pub fn new(transport: Arc<dyn GraphQLTransport>) -> Self {
        Self { transport }
    }

    /// One aliased sub-query per request; names travel as variables.
    pub fn build_query(requests: &[ResolutionRequest]) -> (String, Value) {
        let mut params = Vec::with_capacity(requests.len());
        let mut selections = Vec::with_capacity(requests.len());
        let mut variables = Map::new();

        for request in requests {
            let var = format!("n{}", request.id);
            params.push(format!("${}: String!", var));
            let selection = match request.kind {
                RequestKind::Package => "packageByName(name: $VAR) { address }",
                RequestKind::MoveType => "typeByName(name: $VAR) { repr }",
            };
            selections.push(format!(
                "  {}: {}",
                request.alias(),
                selection.replace("$VAR", &format!("${}", var))
            ));
            variables.insert(var, Value::String(request.name.clone()));
        }

        let query = format!(
            "query ResolveNames({}) {{\n{}\n}}",
            params.join(", "),
            selections.join("\n")
        );
        (query, Value::Object(variables))
    }

    fn parse_response(requests: &[ResolutionRequest], data: &Value) -> Result<ResolutionMap> {
        let mut resolved = ResolutionMap::new();
        for request in requests {
            let entry = aliased(data, &request.alias());
            let value = match request.kind {
                RequestKind::Package => entry
                    .and_then(|e| e.get("address"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| ResolutionError::NameNotFound {
                        name: request.name.clone(),
                    })?,
                RequestKind::MoveType => entry
                    .and_then(|e| e.get("repr"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| ResolutionError::TypeNotFound {
                        type_name: request.name.clone(),
                    })?,
            };
            tracing::trace!(name = %request.name, value, "resolved");
            resolved.insert(request.name.clone(), value);
        }
        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl NameResolver for DirectResolver {
    async fn resolve_batch(&self, requests: &[ResolutionRequest]) -> Result<ResolutionMap> {
        if requests.is_empty() {
            return Ok(ResolutionMap::new());
        }
        let (query, variables) = Self::build_query(requests);
        tracing::debug!(requests = requests.len(), "direct resolution query");
        let data = run_query(&self.transport, query, variables).await?;
        Self::parse_response(requests, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::resolution_error;
    use serde_json::json;
    use sui_transport::test_utils::MockTransport;

    fn requests() -> Vec<ResolutionRequest> {
        vec![
            ResolutionRequest {
                id: 0,
                kind: RequestKind::Package,
                name: "nft@sample".to_string(),
            },
            ResolutionRequest {
                id: 1,
                kind: RequestKind::MoveType,
                name: "nft@sample::demo::NFT".to_string(),
            },
        ]
    }

    #[test]
    fn test_build_query_aliases_by_id() {
        let (query, variables) = DirectResolver::build_query(&requests());
        assert!(query.contains("$n0: String!, $n1: String!"));
        assert!(query.contains("r0: packageByName(name: $n0) { address }"));
        assert!(query.contains("r1: typeByName(name: $n1) { repr }"));
        assert_eq!(variables["n1"], "nft@sample::demo::NFT");
    }

    #[tokio::test]
    async fn test_resolve_batch() {
        let transport = MockTransport::new(|_, _| {
            Ok(json!({
                "r0": { "address": "0xabc" },
                "r1": { "repr": "0x0000000000000000000000000000000000000000000000000000000000000abc::demo::NFT" }
            }))
        });
        let resolver = DirectResolver::new(Arc::new(transport.clone()));

        let resolved = resolver.resolve_batch(&requests()).await.unwrap();
        assert_eq!(resolved.get("nft@sample"), Some("0xabc"));
        assert!(resolved
            .get("nft@sample::demo::NFT")
            .unwrap()
            .ends_with("::demo::NFT"));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_type_is_fatal() {
        let transport = MockTransport::new(|_, _| {
            Ok(json!({ "r0": { "address": "0xabc" }, "r1": null }))
        });
        let resolver = DirectResolver::new(Arc::new(transport));

        let err = resolver.resolve_batch(&requests()).await.unwrap_err();
        assert_eq!(
            resolution_error(&err),
            Some(&ResolutionError::TypeNotFound {
                type_name: "nft@sample::demo::NFT".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let transport = MockTransport::new(|_, _| Err(anyhow::anyhow!("GraphQL error: boom")));
        let resolver = DirectResolver::new(Arc::new(transport));
        let err = resolver.resolve_batch(&requests()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
