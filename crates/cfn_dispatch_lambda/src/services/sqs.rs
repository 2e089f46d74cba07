use std::collections::{BTreeMap, HashMap};

use aws_sdk_sqs::types::QueueAttributeName;
use serde_json::Value;

use crate::adapters::capability::Capability;
use crate::runtime::kwargs::{Kwargs, KwargsError};
use crate::services::{sdk_error_text, unsupported_method};

pub const SQS_SERVICE: &str = "sqs";
pub const SQS_METHODS: &[&str] = &["create_queue", "delete_queue", "send_message", "purge_queue"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqsCall {
    CreateQueue {
        queue_name: String,
        attributes: BTreeMap<String, String>,
        tags: BTreeMap<String, String>,
    },
    DeleteQueue {
        queue_url: String,
    },
    SendMessage {
        queue_url: String,
        message_body: String,
        delay_seconds: Option<i32>,
        message_group_id: Option<String>,
        message_deduplication_id: Option<String>,
    },
    PurgeQueue {
        queue_url: String,
    },
}

impl SqsCall {
    pub fn parse(method: &str, properties: &Value) -> Result<Self, String> {
        let mut kwargs = Kwargs::from_value(properties).map_err(|error| error.to_string())?;
        let call = parse_kwargs(method, &mut kwargs)
            .map_err(|error| error.to_string())?
            .ok_or_else(|| unsupported_method(SQS_SERVICE, method))?;
        kwargs.finish().map_err(|error| error.to_string())?;
        Ok(call)
    }
}

fn parse_kwargs(method: &str, kwargs: &mut Kwargs) -> Result<Option<SqsCall>, KwargsError> {
    let call = match method {
        "create_queue" => SqsCall::CreateQueue {
            queue_name: kwargs.required_str("QueueName")?,
            attributes: kwargs.optional_string_map("Attributes")?.unwrap_or_default(),
            tags: kwargs.optional_string_map("tags")?.unwrap_or_default(),
        },
        "delete_queue" => SqsCall::DeleteQueue {
            queue_url: kwargs.required_str("QueueUrl")?,
        },
        "send_message" => SqsCall::SendMessage {
            queue_url: kwargs.required_str("QueueUrl")?,
            message_body: kwargs.required_str("MessageBody")?,
            delay_seconds: kwargs.optional_i32("DelaySeconds")?,
            message_group_id: kwargs.optional_str("MessageGroupId")?,
            message_deduplication_id: kwargs.optional_str("MessageDeduplicationId")?,
        },
        "purge_queue" => SqsCall::PurgeQueue {
            queue_url: kwargs.required_str("QueueUrl")?,
        },
        _ => return Ok(None),
    };
    Ok(Some(call))
}

pub struct SqsCapability {
    client: aws_sdk_sqs::Client,
}

impl SqsCapability {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }
}

impl Capability for SqsCapability {
    fn service_name(&self) -> &str {
        SQS_SERVICE
    }

    fn methods(&self) -> &[&'static str] {
        SQS_METHODS
    }

    fn invoke(&self, method: &str, properties: &Value) -> Result<(), String> {
        let call = SqsCall::parse(method, properties)?;
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(send_call(client, call))
        })
    }
}

async fn send_call(client: aws_sdk_sqs::Client, call: SqsCall) -> Result<(), String> {
    match call {
        SqsCall::CreateQueue {
            queue_name,
            attributes,
            tags,
        } => {
            let attributes: HashMap<QueueAttributeName, String> = attributes
                .into_iter()
                .map(|(name, value)| (QueueAttributeName::from(name.as_str()), value))
                .collect();
            let tags: HashMap<String, String> = tags.into_iter().collect();
            client
                .create_queue()
                .queue_name(queue_name)
                .set_attributes((!attributes.is_empty()).then_some(attributes))
                .set_tags((!tags.is_empty()).then_some(tags))
                .send()
                .await
                .map(|_| ())
                .map_err(sdk_error_text)
        }
        SqsCall::DeleteQueue { queue_url } => client
            .delete_queue()
            .queue_url(queue_url)
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
        SqsCall::SendMessage {
            queue_url,
            message_body,
            delay_seconds,
            message_group_id,
            message_deduplication_id,
        } => client
            .send_message()
            .queue_url(queue_url)
            .message_body(message_body)
            .set_delay_seconds(delay_seconds)
            .set_message_group_id(message_group_id)
            .set_message_deduplication_id(message_deduplication_id)
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
        SqsCall::PurgeQueue { queue_url } => client
            .purge_queue()
            .queue_url(queue_url)
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
    fn parses_create_queue_attributes() {
        let call = SqsCall::parse(
            "create_queue",
            &json!({
                "QueueName": "jobs.fifo",
                "Attributes": {"FifoQueue": "true", "VisibilityTimeout": "60"}
            }),
        )
        .expect("create_queue should parse");

        assert_eq!(
            call,
            SqsCall::CreateQueue {
                queue_name: "jobs.fifo".to_string(),
                attributes: BTreeMap::from([
                    ("FifoQueue".to_string(), "true".to_string()),
                    ("VisibilityTimeout".to_string(), "60".to_string()),
                ]),
                tags: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn send_message_delay_accepts_string_from_template() {
        let call = SqsCall::parse(
            "send_message",
            &json!({
                "QueueUrl": "https://sqs.eu-west-1.amazonaws.com/123456789012/jobs",
                "MessageBody": "seed",
                "DelaySeconds": "10"
            }),
        )
        .expect("send_message should parse");

        match call {
            SqsCall::SendMessage { delay_seconds, .. } => assert_eq!(delay_seconds, Some(10)),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_delay() {
        let error = SqsCall::parse(
            "send_message",
            &json!({"QueueUrl": "u", "MessageBody": "b", "DelaySeconds": "soon"}),
        )
        .expect_err("delay must be numeric");
        assert!(error.starts_with("Invalid type for parameter DelaySeconds"));
    }

    #[test]
    fn unsupported_method_is_reported_before_arguments() {
        let error = SqsCall::parse("receive_message", &json!({"QueueUrl": "u"}))
            .expect_err("method is not supported");
        assert_eq!(error, "'sqs' object has no attribute 'receive_message'");
    }
}
