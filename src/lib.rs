pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export logic types
pub use logic::{categorize, map_fields, CategorizedPayload, Orchestrator, Resolver, UnmappedPolicy};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::{load_registry_seed, SeedReport};

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};
