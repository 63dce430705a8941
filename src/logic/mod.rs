pub mod categorize;
pub mod mapper;
pub mod orchestrator;

pub use categorize::*;
pub use mapper::*;
pub use orchestrator::*;
