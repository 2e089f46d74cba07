/// Prefix every resolution or invocation failure carries in its report reason.
pub const SDK_ERROR_PREFIX: &str = "boto3 error";

/// `<service>.<method>` pair parsed from the `Action` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTarget<'a> {
    pub service: &'a str,
    pub method: &'a str,
}

impl<'a> ActionTarget<'a> {
    pub fn parse(action: &'a str) -> Result<Self, DispatchError> {
        let mut segments = action.split('.');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(service), Some(method), None) => Ok(Self { service, method }),
            _ => Err(DispatchError::InvalidCall(action.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    InvalidCall(String),
    UnknownService {
        service: String,
        available: Vec<String>,
    },
    UnknownMethod {
        service: String,
        method: String,
    },
    Invocation(String),
}

impl DispatchError {
    /// Text placed in the `Reason` of a FAILED report.
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidCall(action) => format!("Invalid boto3 call: {action}"),
            other => format!("{SDK_ERROR_PREFIX}: {other}"),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCall(action) => write!(f, "invalid call '{action}'"),
            Self::UnknownService { service, available } => write!(
                f,
                "Unknown service: '{service}'. Valid service names are: {}",
                available.join(", ")
            ),
            Self::UnknownMethod { service, method } => {
                write!(f, "'{service}' object has no attribute '{method}'")
            }
            Self::Invocation(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for DispatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_segment_action() {
        let target = ActionTarget::parse("S3.create_bucket").expect("valid action");
        assert_eq!(target.service, "S3");
        assert_eq!(target.method, "create_bucket");
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        for action in ["S3", "S3.create_bucket.extra", "", "a.b.c.d"] {
            let error = ActionTarget::parse(action).expect_err("action should be rejected");
            assert_eq!(error.reason(), format!("Invalid boto3 call: {action}"));
        }
    }

    #[test]
    fn empty_segments_still_count() {
        let target = ActionTarget::parse(".create_bucket").expect("two segments");
        assert_eq!(target.service, "");
    }

    #[test]
    fn resolution_errors_carry_sdk_prefix() {
        let error = DispatchError::UnknownMethod {
            service: "s3".to_string(),
            method: "fly".to_string(),
        };
        assert_eq!(
            error.reason(),
            "boto3 error: 's3' object has no attribute 'fly'"
        );

        let error = DispatchError::Invocation("AccessDenied".to_string());
        assert_eq!(error.reason(), "boto3 error: AccessDenied");
    }
}
