// Policy Responses
//
// Wire shapes returned to the host for both entry points, together with
// the constructors used to build them. Optional fields are omitted from
// the JSON entirely when absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application level error code attached to rejected requests.
pub type Code = u16;

/// Code used for malformed input and rule violations.
pub const BAD_REQUEST: Code = 400;

/// Answer to a `validate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub accepted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    /// Only set by mutating decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutated_object: Option<Value>,
}

/// Answer to a `validate-settings` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsValidationResponse {
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Accept the request unchanged.
pub fn accept_request() -> ValidationResponse {
    ValidationResponse {
        accepted: true,
        message: None,
        code: None,
        mutated_object: None,
    }
}

/// Accept the request. `mutated_object` is how the object must look once
/// admitted.
pub fn mutate_request(mutated_object: Value) -> ValidationResponse {
    ValidationResponse {
        mutated_object: Some(mutated_object),
        ..accept_request()
    }
}

/// Reject the request.
///
/// An empty `message` or a zero `code` leaves the field out of the
/// response.
pub fn reject_request(message: impl Into<String>, code: Code) -> ValidationResponse {
    let message = message.into();
    ValidationResponse {
        accepted: false,
        message: (!message.is_empty()).then_some(message),
        code: (code != 0).then_some(code),
        mutated_object: None,
    }
}

pub fn accept_settings() -> SettingsValidationResponse {
    SettingsValidationResponse {
        valid: true,
        message: None,
    }
}

/// Mark the settings as invalid. An empty `message` is omitted.
pub fn reject_settings(message: impl Into<String>) -> SettingsValidationResponse {
    let message = message.into();
    SettingsValidationResponse {
        valid: false,
        message: (!message.is_empty()).then_some(message),
    }
}
