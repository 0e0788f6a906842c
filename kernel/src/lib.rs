// Annotations Policy Kernel
//
// Admission decisions for Kubernetes resources based on their
// annotations: required pairs are enforced through mutation, forbidden
// keys lead to rejection.

pub mod adapters;
pub mod evaluate;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod settings;

pub use pipeline::{validate, validate_settings, ResponseError};
