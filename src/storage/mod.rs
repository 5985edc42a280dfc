pub mod column_data;

pub use column_data::ColumnData;
