use itertools::Itertools;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{schema_for, EngineError, EntityKind, FieldMap, ResolvedMapping};
use crate::store::traits::RegistryStore;

/// Policy for a source value that has no entry in an otherwise-resolved
/// mapping. Reject is the default: shipping an untranslated value to the
/// CRM fails on its side anyway, so fail here with a precise error.
/// Passthrough is an explicit opt-in for trusted back-channel imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPolicy {
    #[default]
    Reject,
    Passthrough,
}

/// Request-scoped Registry read path. Caches resolved mappings for the
/// lifetime of one request so a payload with repeated enum families hits
/// storage once per family; not meant to be shared across requests, since
/// mappings are low-churn but must not go stale indefinitely.
pub struct Resolver<'a, S: RegistryStore + ?Sized> {
    store: &'a S,
    cache: Mutex<HashMap<String, Arc<ResolvedMapping>>>,
}

impl<'a, S: RegistryStore + ?Sized> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn resolve(&self, enum_name: &str) -> Result<Arc<ResolvedMapping>, EngineError> {
        if let Some(cached) = self.cache.lock().get(enum_name).cloned() {
            return Ok(cached);
        }

        let (mapping, values) = self
            .store
            .get_active_mapping(enum_name)
            .await?
            .ok_or_else(|| EngineError::MappingNotFound {
                enum_name: enum_name.to_string(),
            })?;

        let resolved = Arc::new(ResolvedMapping::from_rows(&mapping, &values));
        self.cache
            .lock()
            .insert(enum_name.to_string(), resolved.clone());
        Ok(resolved)
    }
}

/// Translate every enumerable field of a flat payload into the external
/// system's vocabulary. Non-enumerable fields (free text, numbers, dates,
/// booleans, ids) and keys unknown to the schema pass through untouched;
/// dropping unknown keys is the categorizer's call, not the mapper's.
///
/// Pure over (registry state, payload): same input and same Registry
/// state always yield the same output.
pub async fn map_fields<S: RegistryStore + ?Sized>(
    kind: EntityKind,
    payload: &FieldMap,
    resolver: &Resolver<'_, S>,
    policy: UnmappedPolicy,
) -> Result<FieldMap, EngineError> {
    let schema = schema_for(kind);
    let mut mapped = FieldMap::new();

    for (key, value) in payload {
        let Some(enum_name) = schema.enum_for_field(key) else {
            mapped.insert(key.clone(), value.clone());
            continue;
        };

        let mapping = resolver.resolve(enum_name).await?;
        mapped.insert(key.clone(), map_value(&mapping, value, policy)?);
    }

    Ok(mapped)
}

fn map_value(
    mapping: &ResolvedMapping,
    value: &Value,
    policy: UnmappedPolicy,
) -> Result<Value, EngineError> {
    match value {
        Value::String(s) => map_string(mapping, s, policy).map(Value::String),
        // Array-typed multi-selects are mapped element-wise, order kept.
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => {
                        out.push(Value::String(map_single(mapping, s, policy)?));
                    }
                    other => out.push(other.clone()),
                }
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn map_string(
    mapping: &ResolvedMapping,
    raw: &str,
    policy: UnmappedPolicy,
) -> Result<String, EngineError> {
    if let Some(hubspot) = mapping.translate(raw) {
        return Ok(hubspot.to_string());
    }

    // Comma-delimited multi-select: only attempted when the whole string
    // has no direct mapping, so a legitimate value containing a comma
    // still wins.
    if raw.contains(',') {
        let parts: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        // Under Passthrough a string whose elements all miss the mapping
        // is not a multi-select at all; keep it byte-for-byte instead of
        // re-joining with normalized spacing.
        if policy == UnmappedPolicy::Passthrough
            && !parts.iter().any(|part| mapping.translate(part).is_some())
        {
            return Ok(raw.to_string());
        }

        let mapped: Result<Vec<String>, EngineError> = parts
            .iter()
            .map(|part| map_single(mapping, part, policy))
            .collect();
        return Ok(mapped?.iter().join(", "));
    }

    match policy {
        UnmappedPolicy::Reject => Err(EngineError::ValueNotMapped {
            enum_name: mapping.enum_name.clone(),
            value: raw.to_string(),
        }),
        UnmappedPolicy::Passthrough => Ok(raw.to_string()),
    }
}

fn map_single(
    mapping: &ResolvedMapping,
    raw: &str,
    policy: UnmappedPolicy,
) -> Result<String, EngineError> {
    match mapping.translate(raw) {
        Some(hubspot) => Ok(hubspot.to_string()),
        None => match policy {
            UnmappedPolicy::Reject => Err(EngineError::ValueNotMapped {
                enum_name: mapping.enum_name.clone(),
                value: raw.to_string(),
            }),
            UnmappedPolicy::Passthrough => Ok(raw.to_string()),
        },
    }
}
