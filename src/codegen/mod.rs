//! Marker synthesis: named, reusable schemas with inheritance, from which
//! typed accessors can be generated.

pub mod config;
pub mod marker;
pub mod naming;
pub mod registry;
pub mod synthesizer;

pub use config::SynthesisConfig;
pub use marker::{FieldDescription, FieldType, Marker, MarkerDescription, MarkerField, MarkerId};
pub use registry::MarkerRegistry;
pub use synthesizer::{MarkerSynthesizer, SynthesisResult};
