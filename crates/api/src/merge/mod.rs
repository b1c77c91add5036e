//! Merge engines
//!
//! Folds discovered fields into one duplicate-free set. Query and body
//! parameters additionally have to agree on a single [`Encoding`](crate::field::Encoding).

mod header;
mod parameter;

pub use header::HeaderSet;
pub use header::merge_headers;
pub use parameter::ParameterSet;
pub use parameter::merge;
