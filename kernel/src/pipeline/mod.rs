// Policy Entry Points
//
// Byte-in / byte-out operations invoked by the host:
// raw bytes → parse → settings / evaluation → response bytes
//
// Malformed input and rule violations are answered with a rejection.
// The only error surfaced to the caller is a response that cannot be
// serialized, since there is no channel left to report it through.

use tracing::{debug, info_span, warn};

use crate::adapters::UnstructuredObject;
use crate::evaluate::{evaluate_admission, AdmissionOutcome};
use crate::request::ValidationRequest;
use crate::response::{
    accept_request, accept_settings, mutate_request, reject_request, reject_settings,
    SettingsValidationResponse, ValidationResponse, BAD_REQUEST,
};
use crate::settings::Settings;

/// Errors that abort an invocation.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("cannot serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Validate raw policy settings.
///
/// This function is:
/// - deterministic
/// - side-effect free
/// - independent of any previous call
pub fn validate_settings(input: &[u8]) -> Result<Vec<u8>, ResponseError> {
    let response = settings_response(input);
    Ok(serde_json::to_vec(&response)?)
}

/// Evaluate a raw admission envelope.
pub fn validate(input: &[u8]) -> Result<Vec<u8>, ResponseError> {
    let response = validation_response(input);
    Ok(serde_json::to_vec(&response)?)
}

/// Decision for raw settings, before serialization.
pub fn settings_response(input: &[u8]) -> SettingsValidationResponse {
    let settings = match Settings::from_slice(input) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "cannot parse settings");
            return reject_settings(format!("cannot parse settings: {err}"));
        }
    };

    match settings.validate() {
        Ok(()) => accept_settings(),
        Err(err) => {
            debug!(error = %err, "settings rejected");
            reject_settings(err.to_string())
        }
    }
}

/// Decision for a raw admission envelope, before serialization.
pub fn validation_response(input: &[u8]) -> ValidationResponse {
    let ValidationRequest { request, settings } = match serde_json::from_slice(input) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "cannot parse validation request");
            return reject_request(format!("cannot parse validation request: {err}"), BAD_REQUEST);
        }
    };

    let object = UnstructuredObject::from_value(request.object);
    let kind = match request.kind.kind.as_str() {
        "" => object.as_ref().ok().and_then(|o| o.kind()).unwrap_or_default(),
        kind => kind,
    };
    let name = match request.name.as_deref() {
        Some(name) => name,
        None => object.as_ref().ok().and_then(|o| o.name()).unwrap_or_default(),
    };

    let span = info_span!(
        "validate",
        uid = %request.uid,
        kind,
        name,
        namespace = request.namespace.as_deref().unwrap_or_default(),
        operation = request.operation.as_deref().unwrap_or_default(),
    );
    let _entered = span.enter();

    let settings = match Settings::from_value(settings) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "cannot parse settings");
            return reject_request(format!("cannot parse settings: {err}"), BAD_REQUEST);
        }
    };

    let outcome = match object.and_then(|object| evaluate_admission(&settings, object)) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(error = %err, "cannot read request object");
            return reject_request(format!("cannot read request object: {err}"), BAD_REQUEST);
        }
    };
    debug!(
        accepted = outcome.is_accepted(),
        mutated = outcome.is_mutation(),
        "admission decided"
    );

    match outcome {
        AdmissionOutcome::Accept => accept_request(),
        AdmissionOutcome::Mutate { resource, .. } => mutate_request(resource.into_value()),
        rejected @ AdmissionOutcome::Reject { .. } => reject_request(
            rejected.rejection_message().unwrap_or_default(),
            BAD_REQUEST,
        ),
    }
}
