pub mod builder;
pub mod column;
pub mod data_frame;
pub(crate) mod equality;
pub mod path;
pub mod row;

pub use column::{Column, ColumnGroup, FrameColumn, ValueColumn};
pub use data_frame::DataFrame;
pub use path::ColumnPath;
pub use row::DataRow;
