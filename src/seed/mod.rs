pub mod data;

use serde::Serialize;

use crate::model::{EnumValue, NewEnumMapping};
use crate::store::traits::RegistryStore;

/// Declarative seed for one enum family.
#[derive(Debug, Clone, Copy)]
pub struct MappingSeed {
    pub enum_name: &'static str,
    pub version: i32,
    pub hubspot_property: &'static str,
    pub hubspot_object_type: &'static str,
    pub description: Option<&'static str>,
    pub values: &'static [ValueSeed],
}

/// One seeded value. Sort order is the position in the seed list.
#[derive(Debug, Clone, Copy)]
pub struct ValueSeed {
    pub source: &'static str,
    pub hubspot: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedFailure {
    pub enum_name: String,
    pub reason: String,
}

/// Outcome of one bootstrap run. A single failing mapping never aborts
/// the run; it lands in `failures` and the loader moves on.
#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub mappings_loaded: usize,
    pub mappings_failed: usize,
    pub values_inserted: usize,
    pub values_skipped: usize,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load the declarative registry seed. Idempotent: mappings upsert on
/// `(enum_name, version)`, values skip-if-present on `(mapping,
/// source_value)`, so re-running changes no row counts.
pub async fn load_registry_seed<S: RegistryStore + ?Sized>(
    store: &S,
) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for seed in data::registry_seed() {
        let mapping = match store
            .upsert_mapping(NewEnumMapping {
                enum_name: seed.enum_name.to_string(),
                version: seed.version,
                hubspot_property: seed.hubspot_property.to_string(),
                hubspot_object_type: seed.hubspot_object_type.to_string(),
                description: seed.description.map(str::to_string),
            })
            .await
        {
            Ok(mapping) => mapping,
            Err(e) => {
                log::warn!("seed: mapping '{}' failed: {}", seed.enum_name, e);
                report.mappings_failed += 1;
                report.failures.push(SeedFailure {
                    enum_name: seed.enum_name.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let mut inserted = 0usize;
        let mut skipped = 0usize;
        let mut failed = false;
        for (i, value) in seed.values.iter().enumerate() {
            let row = EnumValue {
                enum_mapping_id: mapping.id.clone(),
                source_value: value.source.to_string(),
                hubspot_value: value.hubspot.to_string(),
                display_label: value.label.to_string(),
                sort_order: i as i32,
                is_active: true,
            };
            match store.insert_value_if_absent(&mapping.id, row).await {
                Ok(true) => inserted += 1,
                Ok(false) => skipped += 1,
                Err(e) => {
                    log::warn!(
                        "seed: value '{}' of '{}' failed: {}",
                        value.source,
                        seed.enum_name,
                        e
                    );
                    report.failures.push(SeedFailure {
                        enum_name: seed.enum_name.to_string(),
                        reason: format!("value '{}': {}", value.source, e),
                    });
                    failed = true;
                }
            }
        }

        if failed {
            report.mappings_failed += 1;
        } else {
            report.mappings_loaded += 1;
        }
        report.values_inserted += inserted;
        report.values_skipped += skipped;
        log::info!(
            "seed: {} v{} — {} inserted, {} skipped",
            seed.enum_name,
            seed.version,
            inserted,
            skipped
        );
    }

    Ok(report)
}
