use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::contract::RequestType;
use crate::mode::DEFAULT_MODE;

pub const RESOURCE_TYPE_PREFIX: &str = "Boto3::";
pub const CUSTOM_RESOURCE_TYPE: &str = "Custom::Boto3";
pub const CUSTOM_RESOURCE_VERSION: &str = "1.0";
pub const DELETE_ACTION_PROPERTY: &str = "_DeleteAction";

/// Invocation payload CloudFormation sends to a template macro.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroRequest {
    pub request_id: String,
    pub fragment: Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MacroStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroResponse {
    pub request_id: String,
    pub status: MacroStatus,
    pub fragment: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    resource: Option<String>,
    message: String,
}

impl TemplateError {
    fn template(message: impl Into<String>) -> Self {
        Self {
            resource: None,
            message: message.into(),
        }
    }

    fn resource(logical_id: &str, message: impl Into<String>) -> Self {
        Self {
            resource: Some(logical_id.to_string()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.resource {
            Some(logical_id) => write!(f, "Resource '{logical_id}': {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TemplateError {}

pub fn process_macro_request(request: MacroRequest, service_token: &str) -> MacroResponse {
    match transform_template(&request.fragment, service_token) {
        Ok(fragment) => MacroResponse {
            request_id: request.request_id,
            status: MacroStatus::Success,
            fragment,
            error_message: None,
        },
        Err(error) => MacroResponse {
            request_id: request.request_id,
            status: MacroStatus::Failure,
            fragment: request.fragment,
            error_message: Some(error.to_string()),
        },
    }
}

/// Rewrites every `Boto3::<Service>.<method>` resource into a `Custom::Boto3`
/// resource served by the dispatch function behind `service_token`.
///
/// Returns a new fragment; the input is left untouched on failure.
pub fn transform_template(fragment: &Value, service_token: &str) -> Result<Value, TemplateError> {
    let mut template = fragment.clone();
    let Some(resources) = template.get_mut("Resources") else {
        return Ok(template);
    };
    let Some(resources) = resources.as_object_mut() else {
        return Err(TemplateError::template("Resources must be a mapping"));
    };

    for (logical_id, resource) in resources.iter_mut() {
        let Some(resource) = resource.as_object_mut() else {
            return Err(TemplateError::resource(logical_id, "resource must be a mapping"));
        };
        let Some(resource_type) = resource.get("Type").and_then(Value::as_str) else {
            return Err(TemplateError::resource(logical_id, "missing string Type"));
        };
        let Some(action) = resource_type.strip_prefix(RESOURCE_TYPE_PREFIX) else {
            continue;
        };
        let action = action.to_string();

        let properties = match resource.get("Properties") {
            None => Value::Object(Map::new()),
            Some(value @ Value::Object(_)) => value.clone(),
            Some(_) => {
                return Err(TemplateError::resource(
                    logical_id,
                    "Properties must be a mapping",
                ));
            }
        };
        let mode = resource
            .remove("Mode")
            .unwrap_or_else(|| default_mode(&properties));

        resource.insert("Type".to_string(), json!(CUSTOM_RESOURCE_TYPE));
        resource.insert("Version".to_string(), json!(CUSTOM_RESOURCE_VERSION));
        resource.insert(
            "Properties".to_string(),
            json!({
                "ServiceToken": service_token,
                "Mode": mode,
                "Action": action,
                "Properties": properties,
            }),
        );
    }

    Ok(template)
}

fn default_mode(properties: &Value) -> Value {
    let mut phases: Vec<&str> = DEFAULT_MODE.iter().map(|phase| phase.as_str()).collect();
    if has_delete_action(properties) {
        phases.push(RequestType::Delete.as_str());
    }
    json!(phases)
}

fn has_delete_action(properties: &Value) -> bool {
    match properties.get(DELETE_ACTION_PROPERTY) {
        None => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
