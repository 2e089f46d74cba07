use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mode::ModeSpec;

pub const MISSING_PARAMETERS_REASON: &str = "Missing required parameters";
pub const COMPLETED_REASON: &str = "Completed successfully";
pub const NO_ACTION_REASON: &str = "No action taken";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Properties configured on a `Custom::Boto3` resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(default)]
    pub mode: Option<ModeSpec>,
}

/// Borrowed view over properties that passed [`ResourceProperties::required`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredProperties<'a> {
    pub action: &'a str,
    pub properties: &'a Value,
}

impl ResourceProperties {
    pub fn required(&self) -> Result<RequiredProperties<'_>, ValidationError> {
        match (self.action.as_deref(), self.properties.as_ref()) {
            (Some(action), Some(properties)) => Ok(RequiredProperties { action, properties }),
            _ => Err(ValidationError::new(MISSING_PARAMETERS_REASON)),
        }
    }
}

/// Lifecycle callback delivered by CloudFormation for a custom resource.
///
/// Keys CloudFormation adds beyond these (`ServiceToken`, `ResourceType`,
/// `OldResourceProperties`, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    #[serde(default)]
    pub resource_properties: ResourceProperties,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

impl OutcomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OutcomeReport {
    pub status: OutcomeStatus,
    pub reason: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub physical_resource_id: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Builds the report sent back to the event's `ResponseURL`.
///
/// The physical id is the `Action` string so that repeated updates of the same
/// action never trigger a replacement. Without an action the logical id stands
/// in, since CloudFormation rejects an empty physical id.
pub fn build_outcome_report(
    event: &LifecycleEvent,
    status: OutcomeStatus,
    reason: impl Into<String>,
) -> OutcomeReport {
    let physical_resource_id = event
        .resource_properties
        .action
        .clone()
        .unwrap_or_else(|| event.logical_resource_id.clone());

    OutcomeReport {
        status,
        reason: reason.into(),
        stack_id: event.stack_id.clone(),
        request_id: event.request_id.clone(),
        logical_resource_id: event.logical_resource_id.clone(),
        physical_resource_id,
        data: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_event() -> Value {
        json!({
            "RequestType": "Create",
            "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:dispatch",
            "ResponseURL": "https://cloudformation-custom-resource-response.example/callback",
            "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/demo/guid",
            "RequestId": "request-1",
            "LogicalResourceId": "Bucket",
            "ResourceType": "Custom::Boto3",
            "ResourceProperties": {
                "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:dispatch",
                "Action": "S3.create_bucket",
                "Properties": {"Bucket": "x"},
                "Mode": "Create"
            }
        })
    }

    #[test]
    fn parses_cloudformation_event_and_ignores_extra_keys() {
        let event: LifecycleEvent =
            serde_json::from_value(sample_event()).expect("event should parse");

        assert_eq!(event.request_type, RequestType::Create);
        assert_eq!(event.logical_resource_id, "Bucket");
        assert_eq!(
            event.resource_properties.action.as_deref(),
            Some("S3.create_bucket")
        );
        assert_eq!(
            event.resource_properties.mode,
            Some(ModeSpec::Phases("Create".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_request_type() {
        let mut raw = sample_event();
        raw["RequestType"] = json!("Rollback");

        let result = serde_json::from_value::<LifecycleEvent>(raw);
        assert!(result.is_err());
    }

    #[test]
    fn required_properties_need_action_and_properties() {
        let missing_properties = ResourceProperties {
            action: Some("S3.create_bucket".to_string()),
            properties: None,
            mode: None,
        };
        let error = missing_properties
            .required()
            .expect_err("missing properties should fail");
        assert_eq!(error.message(), MISSING_PARAMETERS_REASON);

        let missing_action = ResourceProperties {
            action: None,
            properties: Some(json!({})),
            mode: None,
        };
        assert!(missing_action.required().is_err());
    }

    #[test]
    fn report_serializes_with_cloudformation_keys() {
        let event: LifecycleEvent =
            serde_json::from_value(sample_event()).expect("event should parse");
        let report = build_outcome_report(&event, OutcomeStatus::Success, COMPLETED_REASON);

        let body = serde_json::to_value(&report).expect("report should serialize");
        assert_eq!(
            body,
            json!({
                "Status": "SUCCESS",
                "Reason": "Completed successfully",
                "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/demo/guid",
                "RequestId": "request-1",
                "LogicalResourceId": "Bucket",
                "PhysicalResourceId": "S3.create_bucket",
                "Data": {}
            })
        );
    }

    #[test]
    fn report_falls_back_to_logical_id_without_action() {
        let mut raw = sample_event();
        raw["ResourceProperties"] = json!({"Properties": {}});
        let event: LifecycleEvent = serde_json::from_value(raw).expect("event should parse");

        let report = build_outcome_report(&event, OutcomeStatus::Failed, MISSING_PARAMETERS_REASON);
        assert_eq!(report.physical_resource_id, "Bucket");
        assert_eq!(report.status.as_str(), "FAILED");
    }
}
