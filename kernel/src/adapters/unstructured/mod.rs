// Unstructured Object Adapter
//
// Wraps an arbitrary Kubernetes object as raw JSON. Only
// `metadata.annotations` is interpreted; everything else is carried
// through untouched, including key order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AnnotatedResource, Annotations, ResourceError};

/// Any Kubernetes object, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnstructuredObject(Map<String, Value>);

impl UnstructuredObject {
    /// Wrap a decoded JSON value. Anything but a JSON object is rejected.
    pub fn from_value(value: Value) -> Result<Self, ResourceError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(ResourceError::NotAnObject),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// `metadata.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.metadata()?.get("name")?.as_str()
    }

    /// `kind`, if present.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind")?.as_str()
    }

    fn metadata(&self) -> Option<&Map<String, Value>> {
        self.0.get("metadata")?.as_object()
    }
}

impl AnnotatedResource for UnstructuredObject {
    fn annotations(&self) -> Result<Annotations, ResourceError> {
        let metadata = match self.0.get("metadata") {
            None | Some(Value::Null) => return Ok(Annotations::new()),
            Some(Value::Object(metadata)) => metadata,
            Some(_) => return Err(ResourceError::InvalidMetadata),
        };

        let annotations = match metadata.get("annotations") {
            None | Some(Value::Null) => return Ok(Annotations::new()),
            Some(Value::Object(annotations)) => annotations,
            Some(_) => return Err(ResourceError::InvalidAnnotations),
        };

        annotations
            .iter()
            .map(|(key, value)| match value {
                Value::String(value) => Ok((key.clone(), value.clone())),
                _ => Err(ResourceError::NonStringAnnotation(key.clone())),
            })
            .collect()
    }

    fn set_annotations(&mut self, annotations: Annotations) {
        let annotations = annotations
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<Map<_, _>>();

        let metadata = self
            .0
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }

        if let Value::Object(metadata) = metadata {
            metadata.insert("annotations".into(), Value::Object(annotations));
        }
    }
}
