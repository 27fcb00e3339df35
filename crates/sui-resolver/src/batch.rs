//! Request batching.
//!
//! Turns extracted names into indexed resolution requests and splits them into
//! pages. Package requests take ids `0..packages.len()`, type requests continue
//! the sequence; query aliases are derived from these ids.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::ExtractedNames;

/// Default number of requests per remote query.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    Package,
    MoveType,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Package => write!(f, "package"),
            RequestKind::MoveType => write!(f, "moveType"),
        }
    }
}

/// One name to resolve, with a batch-stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub id: usize,
    pub kind: RequestKind,
    pub name: String,
}

impl ResolutionRequest {
    /// GraphQL alias used to correlate a sub-query result with this request.
    pub fn alias(&self) -> String {
        format!("r{}", self.id)
    }
}

/// Build the ordered request list: packages first, then types.
pub fn build_requests(names: &ExtractedNames) -> Vec<ResolutionRequest> {
    let packages = names.packages.iter().map(|n| (RequestKind::Package, n));
    let types = names.types.iter().map(|t| (RequestKind::MoveType, t));

    packages
        .chain(types)
        .enumerate()
        .map(|(id, (kind, name))| ResolutionRequest {
            id,
            kind,
            name: name.clone(),
        })
        .collect()
}

/// Split requests into pages of at most `page_size`, preserving order.
pub fn batch_requests(names: &ExtractedNames, page_size: usize) -> Vec<Vec<ResolutionRequest>> {
    let page_size = page_size.max(1);
    build_requests(names)
        .chunks(page_size)
        .map(<[ResolutionRequest]>::to_vec)
        .collect()
}
