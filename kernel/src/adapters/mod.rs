// Resource Adapters
//
// The evaluator only needs to read and replace the annotation map of the
// object under review. Each concrete object schema gets an adapter that
// exposes exactly that capability and nothing else.

use std::collections::BTreeMap;

pub mod unstructured;

pub use unstructured::UnstructuredObject;

/// Annotation map of a single resource.
pub type Annotations = BTreeMap<String, String>;

/// Errors raised while reading annotations out of a resource.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("object is not a JSON object")]
    NotAnObject,

    #[error("`metadata` is not an object")]
    InvalidMetadata,

    #[error("`metadata.annotations` is not an object")]
    InvalidAnnotations,

    #[error("annotation `{0}` does not have a string value")]
    NonStringAnnotation(String),
}

/// Capability of a resource that carries Kubernetes style annotations.
///
/// Implementations must:
/// - treat a missing annotation map as empty
/// - leave every field other than the annotation map untouched in
///   `set_annotations`
pub trait AnnotatedResource {
    /// Current annotations of the resource.
    fn annotations(&self) -> Result<Annotations, ResourceError>;

    /// Replace the annotation map wholesale.
    fn set_annotations(&mut self, annotations: Annotations);
}
