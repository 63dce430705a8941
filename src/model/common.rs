use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type Id = String;

/// JSON object used for flat payloads and bucket contents.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// The entity families the engine knows how to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Lender,
    LoanApplication,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Lender, EntityKind::LoanApplication];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Lender => write!(f, "lender"),
            EntityKind::LoanApplication => write!(f, "loan-application"),
        }
    }
}

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&EntityKind::LoanApplication).unwrap();
        assert_eq!(json, "\"loan-application\"");
        let back: EntityKind = serde_json::from_str("\"lender\"").unwrap();
        assert_eq!(back, EntityKind::Lender);
    }
}
