// Annotation Compliance Evaluation
//
// Decides whether a resource is accepted as-is, accepted after its
// annotations are brought in line with the required pairs, or rejected
// because it carries forbidden annotations.
//
// The forbidden check always runs first: a resource that carries a
// forbidden key is rejected even if it also misses required pairs.

use std::collections::BTreeSet;

use tracing::debug;

use crate::adapters::{AnnotatedResource, ResourceError};
use crate::settings::{join_keys, Settings};

/// Outcome of evaluating a single resource.
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionOutcome<R> {
    /// Resource already complies.
    Accept,

    /// Resource carries forbidden annotations.
    Reject { forbidden: BTreeSet<String> },

    /// Resource complies once the listed keys are overwritten.
    Mutate { resource: R, updated: BTreeSet<String> },
}

impl<R> AdmissionOutcome<R> {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, AdmissionOutcome::Reject { .. })
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, AdmissionOutcome::Mutate { .. })
    }

    /// User-facing explanation of a rejection.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            AdmissionOutcome::Reject { forbidden } => Some(format!(
                "the following annotations are forbidden: {}",
                join_keys(forbidden)
            )),
            _ => None,
        }
    }
}

/// Evaluate a resource against the rule set.
///
/// The rule set is not re-checked for consistency. A key that is both
/// required and forbidden therefore always leads to a rejection when
/// present and to a mutation when absent.
pub fn evaluate_admission<R>(
    settings: &Settings,
    mut resource: R,
) -> Result<AdmissionOutcome<R>, ResourceError>
where
    R: AnnotatedResource,
{
    let mut annotations = resource.annotations()?;

    let forbidden: BTreeSet<String> = annotations
        .keys()
        .filter(|key| settings.forbidden_annotations.contains(*key))
        .cloned()
        .collect();
    if !forbidden.is_empty() {
        debug!(keys = %join_keys(&forbidden), "forbidden annotations present");
        return Ok(AdmissionOutcome::Reject { forbidden });
    }

    let mut updated = BTreeSet::new();
    for (key, value) in &settings.required_annotations {
        if annotations.get(key) != Some(value) {
            annotations.insert(key.clone(), value.clone());
            updated.insert(key.clone());
        }
    }

    if updated.is_empty() {
        return Ok(AdmissionOutcome::Accept);
    }

    debug!(keys = %join_keys(&updated), "required annotations applied");
    resource.set_annotations(annotations);
    Ok(AdmissionOutcome::Mutate { resource, updated })
}
