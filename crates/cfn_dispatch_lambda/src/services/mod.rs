//! AWS SDK capabilities reachable from the `Action` property.
//!
//! Every capability parses its keyword arguments into a typed call first, so
//! argument errors are reported without a network round trip.

pub mod lambda;
pub mod s3;
pub mod sqs;

use aws_config::SdkConfig;

use crate::adapters::capability::ServiceRegistry;

pub use self::lambda::LambdaCapability;
pub use self::s3::S3Capability;
pub use self::sqs::SqsCapability;

pub fn aws_service_registry(config: &SdkConfig) -> ServiceRegistry {
    ServiceRegistry::new()
        .with(Box::new(S3Capability::new(aws_sdk_s3::Client::new(config))))
        .with(Box::new(SqsCapability::new(aws_sdk_sqs::Client::new(config))))
        .with(Box::new(LambdaCapability::new(aws_sdk_lambda::Client::new(
            config,
        ))))
}

pub(crate) fn sdk_error_text<E>(error: E) -> String
where
    E: std::error::Error,
{
    aws_sdk_s3::error::DisplayErrorContext(error).to_string()
}

pub(crate) fn unsupported_method(service: &str, method: &str) -> String {
    format!("'{service}' object has no attribute '{method}'")
}
