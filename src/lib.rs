// ============================================================================
// RustFrame Library
// ============================================================================

pub mod codegen;
pub mod core;
pub mod frame;
pub mod inference;
pub mod schema;
pub mod select;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{ColumnKind, DataType, ErrorKind, FrameError, Result, ScalarClass, Value};
pub use frame::{Column, ColumnPath, DataFrame, DataRow};
pub use inference::{InferenceOptions, Nullability, infer_type, infer_type_with};
pub use schema::{ColumnSchema, CompareResult, DataFrameSchema};

// Re-export selection API
pub use select::{
    ColumnFilter, ColumnSelector, ColumnSet, IndexSpec, MissingColumnPolicy, ResolutionContext,
    ResolvedColumn, SingleColumn,
};

// Re-export marker synthesis API
pub use codegen::{
    MarkerDescription, MarkerId, MarkerRegistry, MarkerSynthesizer, SynthesisConfig,
    SynthesisResult,
};

// ============================================================================
// Schema to marker in one call
// ============================================================================

/// Synthesizes a marker for the schema of `frame` in a fresh registry and
/// returns the descriptions of every marker declared, nested ones first.
///
/// # Examples
///
/// ```
/// use rustframe::{DataFrame, Value, describe_frame};
///
/// # fn main() -> rustframe::Result<()> {
/// let frame = DataFrame::from_values(vec![
///     ("name", vec![Value::from("Alice"), Value::from("Bob")]),
///     ("age", vec![Value::from(15), Value::from(45)]),
/// ])?;
/// let markers = describe_frame(&frame, &rustframe::SynthesisConfig::default())?;
/// assert_eq!(markers.len(), 1);
/// assert_eq!(markers[0].fields.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn describe_frame(frame: &DataFrame, config: &SynthesisConfig) -> Result<Vec<MarkerDescription>> {
    let mut registry = MarkerRegistry::new();
    let result = MarkerSynthesizer::new(config.clone()).synthesize(frame.schema(), true, &mut registry)?;
    result
        .new_markers
        .iter()
        .map(|&id| registry.describe(id))
        .collect()
}
