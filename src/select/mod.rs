//! Column selection: selectors resolved against a frame under a
//! missing-column policy.

pub mod context;
pub mod filter;
pub mod selector;

pub use context::{MissingColumnPolicy, ResolutionContext, ResolvedColumn};
pub use filter::ColumnFilter;
pub use selector::{ColumnSelector, ColumnSet, IndexSpec, SingleColumn};
