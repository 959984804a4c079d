pub mod args;
pub mod schema;
pub mod types;

pub use schema::{build_schema, ApiSchema};
