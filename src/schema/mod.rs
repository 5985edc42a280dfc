pub mod compare;
pub mod document;
pub mod model;

pub use compare::CompareResult;
pub use model::{ColumnSchema, DataFrameSchema};
