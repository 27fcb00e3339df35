//! Registry + layout resolution.
//!
//! 1. Bulk-fetch the registry record of every distinct name in the batch
//!    (one aliased `dynamicField` lookup per name on the registry table).
//! 2. Bulk-fetch the metadata objects whose `package_address` is needed.
//! 3. Substitute package addresses into each type string and fetch its layout;
//!    the layout's `struct.type` is the canonical type.
//!
//! Each phase depends on the previous one, so they run strictly in order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use sui_mvr_types::{normalize_address, SymbolicName};
use sui_transport::GraphQLTransport;

use super::{aliased, run_query, NameResolver};
use crate::batch::{RequestKind, ResolutionRequest};
use crate::config::RegistryConfig;
use crate::error::ResolutionError;
use crate::extract::names_in_type;
use crate::resolution::ResolutionMap;
use crate::rewrite::substitute_names;

/// BCS layout of the registry's dynamic field key.
#[derive(Serialize)]
struct RegistryNameKey {
    org: DomainKey,
    app: Vec<String>,
}

#[derive(Serialize)]
struct DomainKey {
    labels: Vec<String>,
}

/// Base64 BCS bytes of the registry key for `name`.
pub fn encode_registry_key(name: &SymbolicName) -> Result<String> {
    let key = RegistryNameKey {
        org: DomainKey {
            labels: name.org_labels(),
        },
        app: vec![name.app.clone()],
    };
    let bytes = bcs::to_bytes(&key).with_context(|| format!("encode registry key for {}", name))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// A registry record fetched for one name.
///
/// A record with neither an address nor a metadata object is rejected when it
/// is read, so every mapping carries data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapping {
    pub name: String,
    pub data: MappingData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingData {
    /// Address for the selected network, once known.
    pub active_network_package_address: Option<String>,
    /// Every metadata object the record lists.
    pub package_info_objects: Vec<String>,
    /// Metadata object holding the selected network's address.
    pub package_info_object: Option<String>,
}

/// Read a Move `Option<T>` rendered either as a bare value/null or as `{ "vec": [...] }`.
fn option_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("vec")
            .and_then(Value::as_array)
            .and_then(|v| v.first())
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    }
}

/// Interpret a record's JSON for `name`, picking the entry for `network` if one exists.
pub fn mapping_from_record(name: &str, record: &Value, network: Option<&str>) -> Result<NameMapping> {
    let app_info = record.get("app_info");
    let app_address = option_str(app_info.and_then(|a| a.get("package_address")));
    let app_info_object = option_str(app_info.and_then(|a| a.get("package_info_id")));

    let entries: Vec<(&str, Option<String>, Option<String>)> = record
        .get("networks")
        .and_then(|n| n.get("contents"))
        .and_then(Value::as_array)
        .map(|contents| {
            contents
                .iter()
                .filter_map(|entry| {
                    let key = entry.get("key")?.as_str()?;
                    let value = entry.get("value");
                    Some((
                        key,
                        option_str(value.and_then(|v| v.get("package_address"))),
                        option_str(value.and_then(|v| v.get("package_info_id"))),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let package_info_objects: Vec<String> = app_info_object
        .iter()
        .cloned()
        .chain(entries.iter().filter_map(|(_, _, info)| info.clone()))
        .collect();

    let network_entry = network.and_then(|chain| entries.iter().find(|(key, _, _)| *key == chain));

    let (active, info_object) = match network_entry {
        Some((_, address, info)) => (address.clone(), info.clone()),
        None => (app_address, app_info_object),
    };

    if active.is_none() && info_object.is_none() {
        return Err(ResolutionError::NameNotFound {
            name: name.to_string(),
        }
        .into());
    }

    Ok(NameMapping {
        name: name.to_string(),
        data: MappingData {
            active_network_package_address: active,
            package_info_objects,
            package_info_object: info_object,
        },
    })
}

/// Resolves through on-chain registry records and type layouts.
pub struct RegistryResolver {
    transport: Arc<dyn GraphQLTransport>,
    config: RegistryConfig,
    network: Option<String>,
    /// Package addresses known up front; these names never reach the registry.
    known: ResolutionMap,
}

impl RegistryResolver {
    pub fn new(
        transport: Arc<dyn GraphQLTransport>,
        config: RegistryConfig,
        network: Option<String>,
    ) -> Self {
        Self {
            transport,
            config,
            network,
            known: ResolutionMap::new(),
        }
    }

    /// Treat the package entries of `known` as already resolved.
    pub fn with_known_packages(mut self, known: &ResolutionMap) -> Self {
        self.known = known
            .iter()
            .filter(|(key, _)| !key.contains("::"))
            .collect();
        self
    }

    async fn fetch_records(&self, names: &[SymbolicName]) -> Result<Vec<NameMapping>> {
        let mut params = vec!["$registry: SuiAddress!".to_string(), "$nameType: String!".to_string()];
        let mut selections = Vec::with_capacity(names.len());
        let mut variables = Map::new();
        variables.insert("registry".into(), Value::String(self.config.registry_table_id.clone()));
        variables.insert("nameType".into(), Value::String(self.config.name_type.clone()));

        for (i, name) in names.iter().enumerate() {
            params.push(format!("$k{}: Base64!", i));
            selections.push(format!(
                "    r{i}: dynamicField(name: {{ type: $nameType, bcs: $k{i} }}) {{ value {{ ... on MoveValue {{ json }} }} }}"
            ));
            variables.insert(format!("k{}", i), Value::String(encode_registry_key(name)?));
        }

        let query = format!(
            "query RegistryRecords({}) {{\n  object(address: $registry) {{\n{}\n  }}\n}}",
            params.join(", "),
            selections.join("\n")
        );

        tracing::debug!(names = names.len(), "fetching registry records");
        let data = run_query(&self.transport, query, Value::Object(variables)).await?;
        let table = data
            .get("object")
            .filter(|o| !o.is_null())
            .ok_or_else(|| anyhow!("registry table {} not found", self.config.registry_table_id))?;

        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.to_string();
                let record = aliased(table, &format!("r{}", i))
                    .and_then(|f| f.get("value"))
                    .and_then(|v| v.get("json"))
                    .filter(|j| !j.is_null())
                    .ok_or_else(|| ResolutionError::NameNotFound { name: name.clone() })?;
                mapping_from_record(&name, record, self.network.as_deref())
            })
            .collect()
    }

    /// Fetch metadata objects, returning normalized object id -> package address.
    async fn fetch_package_infos(&self, ids: &[String]) -> Result<BTreeMap<String, String>> {
        let mut params = Vec::with_capacity(ids.len());
        let mut selections = Vec::with_capacity(ids.len());
        let mut variables = Map::new();

        for (i, id) in ids.iter().enumerate() {
            params.push(format!("$o{}: SuiAddress!", i));
            selections.push(format!(
                "  r{i}: object(address: $o{i}) {{ address asMoveObject {{ contents {{ json }} }} }}"
            ));
            variables.insert(format!("o{}", i), Value::String(id.clone()));
        }

        let query = format!(
            "query PackageInfos({}) {{\n{}\n}}",
            params.join(", "),
            selections.join("\n")
        );

        tracing::debug!(objects = ids.len(), "fetching package info objects");
        let data = run_query(&self.transport, query, Value::Object(variables)).await?;

        let mut addresses = BTreeMap::new();
        for (i, id) in ids.iter().enumerate() {
            let address = aliased(&data, &format!("r{}", i))
                .and_then(|o| o.get("asMoveObject"))
                .and_then(|m| m.get("contents"))
                .and_then(|c| c.get("json"))
                .and_then(|j| j.get("package_address"))
                .and_then(Value::as_str);
            if let Some(address) = address {
                addresses.insert(normalize_address(id), address.to_string());
            }
        }
        Ok(addresses)
    }

    /// Fetch layouts for concrete type strings, returning type -> canonical struct type.
    async fn fetch_type_layouts(&self, types: &[String]) -> Result<BTreeMap<String, String>> {
        let mut params = Vec::with_capacity(types.len());
        let mut selections = Vec::with_capacity(types.len());
        let mut variables = Map::new();

        for (i, type_name) in types.iter().enumerate() {
            params.push(format!("$t{}: String!", i));
            selections.push(format!("  r{i}: type(type: $t{i}) {{ layout }}"));
            variables.insert(format!("t{}", i), Value::String(type_name.clone()));
        }

        let query = format!(
            "query TypeLayouts({}) {{\n{}\n}}",
            params.join(", "),
            selections.join("\n")
        );

        tracing::debug!(types = types.len(), "fetching type layouts");
        let data = run_query(&self.transport, query, Value::Object(variables)).await?;

        let mut canonical = BTreeMap::new();
        for (i, type_name) in types.iter().enumerate() {
            let repr = aliased(&data, &format!("r{}", i))
                .and_then(|t| t.get("layout"))
                .and_then(|l| l.get("struct"))
                .and_then(|s| s.get("type"))
                .and_then(Value::as_str);
            if let Some(repr) = repr {
                canonical.insert(type_name.clone(), repr.to_string());
            }
        }
        Ok(canonical)
    }

    /// Metadata object ids phase 2 has to fetch.
    fn metadata_to_fetch(&self, mappings: &[NameMapping]) -> Vec<String> {
        let eager = self.config.eager_metadata_fetch && self.network.is_none();
        let ids: BTreeSet<String> = mappings
            .iter()
            .map(|m| &m.data)
            .flat_map(|data| {
                if eager {
                    data.package_info_objects.clone()
                } else if data.active_network_package_address.is_none() {
                    data.package_info_object.iter().cloned().collect()
                } else {
                    Vec::new()
                }
            })
            .collect();
        ids.into_iter().collect()
    }

    /// Phases 1 and 2: names -> package addresses.
    async fn resolve_packages(&self, names: &BTreeSet<String>) -> Result<ResolutionMap> {
        let parsed = names
            .iter()
            .map(|name| {
                let parsed: SymbolicName = name.parse().map_err(|e: anyhow::Error| {
                    ResolutionError::InvalidName {
                        name: name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if parsed.version.is_some() {
                    return Err(ResolutionError::InvalidName {
                        name: name.clone(),
                        reason: format!(
                            "registry records carry only the latest address; use {} or the direct protocol",
                            parsed.unversioned()
                        ),
                    }
                    .into());
                }
                Ok(parsed)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut mappings = self.fetch_records(&parsed).await?;

        let to_fetch = self.metadata_to_fetch(&mappings);
        let infos = if to_fetch.is_empty() {
            BTreeMap::new()
        } else {
            self.fetch_package_infos(&to_fetch).await?
        };

        let mut resolved = ResolutionMap::new();
        for mapping in mappings.iter_mut() {
            let data = &mut mapping.data;
            if data.active_network_package_address.is_none() {
                let object_id = data.package_info_object.clone().unwrap_or_default();
                let address = infos.get(&normalize_address(&object_id)).ok_or_else(|| {
                    ResolutionError::MissingMetadataObject {
                        name: mapping.name.clone(),
                        object_id: object_id.clone(),
                    }
                })?;
                data.active_network_package_address = Some(address.clone());
            }
            if let Some(address) = &data.active_network_package_address {
                resolved.insert(mapping.name.clone(), normalize_address(address));
            }
        }

        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl NameResolver for RegistryResolver {
    async fn resolve_batch(&self, requests: &[ResolutionRequest]) -> Result<ResolutionMap> {
        let mut names = BTreeSet::new();
        let mut types = Vec::new();
        for request in requests {
            match request.kind {
                RequestKind::Package => {
                    names.insert(request.name.clone());
                }
                RequestKind::MoveType => {
                    names.extend(names_in_type(&request.name));
                    types.push(request.name.clone());
                }
            }
        }

        let mut resolved = ResolutionMap::new();
        names.retain(|name| match self.known.get(name) {
            Some(address) => {
                resolved.insert(name.clone(), normalize_address(address));
                false
            }
            None => true,
        });

        if !names.is_empty() {
            resolved.merge(self.resolve_packages(&names).await?);
        }
        if types.is_empty() {
            return Ok(resolved);
        }

        let intermediate: BTreeMap<String, String> = {
            let subs = resolved.name_substitutions();
            types
                .iter()
                .map(|t| (t.clone(), substitute_names(t, &subs)))
                .collect()
        };
        let distinct: Vec<String> = intermediate
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let layouts = self.fetch_type_layouts(&distinct).await?;
        for (original, concrete) in intermediate {
            let repr = layouts
                .get(&concrete)
                .ok_or_else(|| ResolutionError::TypeNotFound {
                    type_name: original.clone(),
                })?;
            resolved.insert(original, repr.clone());
        }

        Ok(resolved)
    }
}
