use serde_json::Value;
use tracing::{info, warn};

use crate::runtime::template::{process_macro_request, MacroRequest, MacroResponse, MacroStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroHandlerConfig {
    /// ServiceToken written into every rewritten resource: the ARN of the
    /// custom-resource dispatch function.
    pub service_token: String,
}

pub fn handle_macro_event(event: Value, config: &MacroHandlerConfig) -> Result<MacroResponse, String> {
    info!(event = %event, "received macro invocation");

    let request: MacroRequest = serde_json::from_value(event)
        .map_err(|error| format!("invalid macro payload: {error}"))?;
    let response = process_macro_request(request, &config.service_token);

    match (response.status, response.error_message.as_deref()) {
        (MacroStatus::Failure, Some(message)) => {
            warn!(request_id = %response.request_id, error = message, "template transform failed");
        }
        _ => info!(request_id = %response.request_id, "template transformed"),
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> MacroHandlerConfig {
        MacroHandlerConfig {
            service_token: "arn:aws:lambda:eu-west-1:123456789012:function:dispatch".to_string(),
        }
    }

    #[test]
    fn transforms_macro_fragment() {
        let response = handle_macro_event(
            json!({
                "region": "eu-west-1",
                "accountId": "123456789012",
                "requestId": "macro-request",
                "transformId": "123456789012::Boto3",
                "params": {},
                "templateParameterValues": {},
                "fragment": {
                    "Resources": {
                        "Seed": {
                            "Type": "Boto3::Lambda.invoke",
                            "Mode": "Create",
                            "Properties": {"FunctionName": "seed"}
                        }
                    }
                }
            }),
            &config(),
        )
        .expect("macro should respond");

        assert_eq!(response.request_id, "macro-request");
        assert_eq!(response.status, MacroStatus::Success);
        let properties = &response.fragment["Resources"]["Seed"]["Properties"];
        assert_eq!(properties["Action"], "Lambda.invoke");
        assert_eq!(properties["Mode"], "Create");
        assert_eq!(
            properties["ServiceToken"],
            "arn:aws:lambda:eu-west-1:123456789012:function:dispatch"
        );
    }

    #[test]
    fn failed_transform_keeps_fragment_and_reports_error() {
        let fragment = json!({"Resources": {"Broken": {"Properties": {}}}});
        let response = handle_macro_event(
            json!({"requestId": "macro-request", "fragment": fragment.clone()}),
            &config(),
        )
        .expect("macro should respond");

        assert_eq!(response.status, MacroStatus::Failure);
        assert_eq!(response.fragment, fragment);
        assert_eq!(
            response.error_message.as_deref(),
            Some("Resource 'Broken': missing string Type")
        );
    }

    #[test]
    fn payload_without_fragment_is_rejected() {
        let error = handle_macro_event(json!({"requestId": "macro-request"}), &config())
            .expect_err("fragment is required");
        assert!(error.starts_with("invalid macro payload"));
    }
}
