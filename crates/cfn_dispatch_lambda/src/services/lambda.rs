use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde_json::Value;
use tracing::warn;

use crate::adapters::capability::Capability;
use crate::runtime::kwargs::{Kwargs, KwargsError};
use crate::services::{sdk_error_text, unsupported_method};

pub const LAMBDA_SERVICE: &str = "lambda";
pub const LAMBDA_METHODS: &[&str] = &["invoke", "delete_function"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaCall {
    Invoke {
        function_name: String,
        invocation_type: Option<String>,
        payload: Option<Vec<u8>>,
        qualifier: Option<String>,
    },
    DeleteFunction {
        function_name: String,
        qualifier: Option<String>,
    },
}

impl LambdaCall {
    pub fn parse(method: &str, properties: &Value) -> Result<Self, String> {
        let mut kwargs = Kwargs::from_value(properties).map_err(|error| error.to_string())?;
        let call = parse_kwargs(method, &mut kwargs)
            .map_err(|error| error.to_string())?
            .ok_or_else(|| unsupported_method(LAMBDA_SERVICE, method))?;
        kwargs.finish().map_err(|error| error.to_string())?;
        Ok(call)
    }
}

fn parse_kwargs(method: &str, kwargs: &mut Kwargs) -> Result<Option<LambdaCall>, KwargsError> {
    let call = match method {
        "invoke" => LambdaCall::Invoke {
            function_name: kwargs.required_str("FunctionName")?,
            invocation_type: kwargs.optional_str("InvocationType")?,
            payload: kwargs.optional_blob("Payload")?,
            qualifier: kwargs.optional_str("Qualifier")?,
        },
        "delete_function" => LambdaCall::DeleteFunction {
            function_name: kwargs.required_str("FunctionName")?,
            qualifier: kwargs.optional_str("Qualifier")?,
        },
        _ => return Ok(None),
    };
    Ok(Some(call))
}

pub struct LambdaCapability {
    client: aws_sdk_lambda::Client,
}

impl LambdaCapability {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

impl Capability for LambdaCapability {
    fn service_name(&self) -> &str {
        LAMBDA_SERVICE
    }

    fn methods(&self) -> &[&'static str] {
        LAMBDA_METHODS
    }

    fn invoke(&self, method: &str, properties: &Value) -> Result<(), String> {
        let call = LambdaCall::parse(method, properties)?;
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(send_call(client, call))
        })
    }
}

async fn send_call(client: aws_sdk_lambda::Client, call: LambdaCall) -> Result<(), String> {
    match call {
        LambdaCall::Invoke {
            function_name,
            invocation_type,
            payload,
            qualifier,
        } => {
            let output = client
                .invoke()
                .function_name(function_name.clone())
                .set_invocation_type(
                    invocation_type.map(|value| InvocationType::from(value.as_str())),
                )
                .set_payload(payload.map(Blob::new))
                .set_qualifier(qualifier)
                .send()
                .await
                .map_err(sdk_error_text)?;

            // The API call itself succeeded; a function error is only surfaced
            // in the response and does not fail the resource.
            if let Some(function_error) = output.function_error() {
                warn!(
                    function = %function_name,
                    function_error,
                    "invoked function reported an error"
                );
            }
            Ok(())
        }
        LambdaCall::DeleteFunction {
            function_name,
            qualifier,
        } => client
            .delete_function()
            .function_name(function_name)
            .set_qualifier(qualifier)
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_async_invoke_with_json_payload() {
        let call = LambdaCall::parse(
            "invoke",
            &json!({
                "FunctionName": "seed-data",
                "InvocationType": "Event",
                "Payload": {"table": "users"}
            }),
        )
        .expect("invoke should parse");

        assert_eq!(
            call,
            LambdaCall::Invoke {
                function_name: "seed-data".to_string(),
                invocation_type: Some("Event".to_string()),
                payload: Some(b"{\"table\":\"users\"}".to_vec()),
                qualifier: None,
            }
        );
    }

    #[test]
    fn delete_function_requires_name() {
        let error = LambdaCall::parse("delete_function", &json!({"Qualifier": "1"}))
            .expect_err("function name is required");
        assert_eq!(
            error,
            "Missing required parameter in input: \"FunctionName\""
        );
    }
}
