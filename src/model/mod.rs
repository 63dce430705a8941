pub mod aggregate;
pub mod common;
pub mod error;
pub mod registry;
pub mod schema;

pub use aggregate::*;
pub use common::*;
pub use error::*;
pub use registry::*;
pub use schema::*;
