// Admission Request Envelope
//
// Input received by the `validate` entry point: the admission request
// issued by the API server plus the raw settings of the policy instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope handed to the policy by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub request: AdmissionRequest,

    /// Raw policy settings, decoded separately so that a malformed rule
    /// set can be reported on its own.
    #[serde(default)]
    pub settings: Value,
}

/// Subset of `admission.k8s.io/v1` `AdmissionRequest`.
///
/// Only the object and its identity are consumed. Every other field sent
/// by the API server is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    #[serde(default)]
    pub uid: String,

    #[serde(default)]
    pub kind: GroupVersionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// The object under review, kept opaque until an adapter reads it.
    #[serde(default)]
    pub object: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
}
