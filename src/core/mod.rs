pub mod error;
pub mod memo;
pub mod types;
pub mod value;

pub use error::{ErrorKind, FrameError, Result};
pub use memo::Memo;
pub use types::{ColumnKind, DataType, ScalarClass, TypeClass};
pub use value::Value;
