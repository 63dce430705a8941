use crate::model::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One versioned field family in the Enum Registry.
///
/// `(enum_name, version)` is unique. At most one version per `enum_name`
/// is active at a time; the store write path enforces this, the read path
/// still tie-breaks defensively on the highest version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMapping {
    pub id: Id,
    pub enum_name: String,
    pub version: i32,
    pub hubspot_property: String,
    pub hubspot_object_type: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One allowed value of an EnumMapping. `source_value` is unique within
/// its mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub enum_mapping_id: Id,
    pub source_value: String,
    pub hubspot_value: String,
    pub display_label: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Input shape for creating or retargeting a mapping version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnumMapping {
    pub enum_name: String,
    pub version: i32,
    pub hubspot_property: String,
    pub hubspot_object_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Read-path projection of the active mapping for one enum family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMapping {
    pub enum_name: String,
    pub version: i32,
    pub hubspot_property: String,
    pub hubspot_object_type: String,
    /// source_value -> hubspot_value, active values only.
    pub values: HashMap<String, String>,
}

impl ResolvedMapping {
    pub fn from_rows(mapping: &EnumMapping, values: &[EnumValue]) -> Self {
        let values = values
            .iter()
            .filter(|v| v.is_active)
            .map(|v| (v.source_value.clone(), v.hubspot_value.clone()))
            .collect();

        ResolvedMapping {
            enum_name: mapping.enum_name.clone(),
            version: mapping.version,
            hubspot_property: mapping.hubspot_property.clone(),
            hubspot_object_type: mapping.hubspot_object_type.clone(),
            values,
        }
    }

    pub fn translate(&self, source_value: &str) -> Option<&str> {
        self.values.get(source_value).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> EnumMapping {
        let now = Utc::now();
        EnumMapping {
            id: "m1".to_string(),
            enum_name: "lenderCategory".to_string(),
            version: 1,
            hubspot_property: "lender_category".to_string(),
            hubspot_object_type: "2-11111111".to_string(),
            is_active: true,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn value(source: &str, hubspot: &str, active: bool) -> EnumValue {
        EnumValue {
            enum_mapping_id: "m1".to_string(),
            source_value: source.to_string(),
            hubspot_value: hubspot.to_string(),
            display_label: hubspot.to_string(),
            sort_order: 0,
            is_active: active,
        }
    }

    #[test]
    fn resolved_mapping_skips_inactive_values() {
        let resolved = ResolvedMapping::from_rows(
            &mapping(),
            &[
                value("domestic", "Domestic", true),
                value("international", "International", false),
            ],
        );
        assert_eq!(resolved.translate("domestic"), Some("Domestic"));
        assert_eq!(resolved.translate("international"), None);
    }
}
