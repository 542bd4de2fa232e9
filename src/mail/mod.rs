mod header;
mod query;
mod types;

pub use header::*;
pub use query::*;
pub use types::*;
