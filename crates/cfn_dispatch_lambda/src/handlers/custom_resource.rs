use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapters::callback::ResponseSender;
use crate::adapters::capability::CapabilityRegistry;
use crate::runtime::action::{ActionTarget, DispatchError};
use crate::runtime::contract::{
    build_outcome_report, LifecycleEvent, OutcomeReport, OutcomeStatus, COMPLETED_REASON,
    NO_ACTION_REASON,
};
use crate::runtime::mode::should_execute_mode;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomResourceError {
    pub message: String,
    /// Report that could not be delivered, when the failure happened on the
    /// callback.
    pub undelivered_report: Option<OutcomeReport>,
}

impl std::fmt::Display for CustomResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CustomResourceError {}

/// Handles one lifecycle event and sends exactly one outcome report.
///
/// Every dispatch failure becomes a FAILED report. Errors are returned only
/// when the event cannot be addressed or the report could not be delivered;
/// the callback is never retried.
pub fn handle_custom_resource_event(
    event: Value,
    registry: &dyn CapabilityRegistry,
    responder: &dyn ResponseSender,
) -> Result<OutcomeReport, CustomResourceError> {
    info!(event = %event, "received lifecycle event");

    let event: LifecycleEvent =
        serde_json::from_value(event).map_err(|error| CustomResourceError {
            message: format!("invalid lifecycle event: {error}"),
            undelivered_report: None,
        })?;

    let (status, reason) = decide_outcome(&event, registry);
    let report = build_outcome_report(&event, status, reason);
    info!(
        status = report.status.as_str(),
        reason = %report.reason,
        logical_resource_id = %report.logical_resource_id,
        "sending outcome report"
    );

    if let Err(error) = responder.send_response(&event.response_url, &report) {
        warn!(%error, "outcome report was not delivered");
        return Err(CustomResourceError {
            message: error,
            undelivered_report: Some(report),
        });
    }

    Ok(report)
}

fn decide_outcome(
    event: &LifecycleEvent,
    registry: &dyn CapabilityRegistry,
) -> (OutcomeStatus, String) {
    let properties = &event.resource_properties;
    let required = match properties.required() {
        Ok(value) => value,
        Err(error) => {
            warn!(?properties, "bad properties");
            return (OutcomeStatus::Failed, error.message().to_string());
        }
    };

    if !should_execute_mode(event.request_type, properties.mode.as_ref()) {
        return (OutcomeStatus::Success, NO_ACTION_REASON.to_string());
    }

    execute(required.action, required.properties, registry)
}

/// Resolves `action` as `<service>.<method>` and invokes it with
/// `properties` as keyword arguments.
pub fn execute(
    action: &str,
    properties: &Value,
    registry: &dyn CapabilityRegistry,
) -> (OutcomeStatus, String) {
    match dispatch(action, properties, registry) {
        Ok(()) => (OutcomeStatus::Success, COMPLETED_REASON.to_string()),
        Err(error) => (OutcomeStatus::Failed, error.reason()),
    }
}

fn dispatch(
    action: &str,
    properties: &Value,
    registry: &dyn CapabilityRegistry,
) -> Result<(), DispatchError> {
    let target = ActionTarget::parse(action)?;
    let capability = registry.resolve_capability(target.service)?;
    let method = capability.resolve_method(target.method)?;
    debug!(
        service = capability.service_name(),
        method, "invoking resolved capability"
    );

    capability
        .invoke(method, properties)
        .map_err(DispatchError::Invocation)
}
